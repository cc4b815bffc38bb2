#![allow(dead_code)]

use nekomemo_engine::events::{Phase, SessionEvent};
use nekomemo_engine::level::configure;
use nekomemo_engine::notify::NullNotifier;
use nekomemo_engine::save::MemorySave;
use nekomemo_engine::session::{SessionController, SessionOptions};

pub type Session = SessionController<MemorySave, NullNotifier>;

pub const DT: f32 = 1.0 / 60.0;

pub fn options(seed: u64) -> SessionOptions {
    SessionOptions {
        seed: Some(seed),
        ..SessionOptions::default()
    }
}

/// Routes engine tracing into the test harness output. Set `RUST_LOG=debug` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn level_session(level_id: u32, seed: u64) -> Session {
    init_tracing();
    SessionController::new(
        configure(level_id).expect("valid level"),
        MemorySave::default(),
        NullNotifier,
        options(seed),
    )
    .expect("session starts")
}

/// Ticks until `done` holds. Panics after `max_ticks`.
pub fn tick_until(s: &mut Session, max_ticks: usize, mut done: impl FnMut(&Session) -> bool) {
    for _ in 0..max_ticks {
        if done(s) {
            return;
        }
        s.tick(DT);
    }
    assert!(done(s), "condition not reached, phase {:?}", s.phase());
}

pub fn touch_index(s: &mut Session, index: usize) -> bool {
    let (x, y) = s.cards()[index].rect().center();
    s.touch_card(x, y)
}

/// Lowest pair whose two cards are both face down and clickable.
pub fn clickable_pair(s: &Session) -> Option<(usize, usize)> {
    let cards = s.cards();
    let mut pair_ids: Vec<u32> = cards
        .iter()
        .filter(|c| c.can_be_clicked())
        .map(|c| c.pair_id())
        .collect();
    pair_ids.sort_unstable();
    pair_ids.dedup();
    pair_ids.into_iter().find_map(|pid| {
        let idx: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.pair_id() == pid && c.can_be_clicked())
            .map(|(i, _)| i)
            .collect();
        (idx.len() == 2).then(|| (idx[0], idx[1]))
    })
}

/// Two clickable cards from different pairs.
pub fn clickable_mismatch(s: &Session) -> Option<(usize, usize)> {
    let cards = s.cards();
    let first = cards.iter().position(|c| c.can_be_clicked())?;
    let second = cards
        .iter()
        .position(|c| c.can_be_clicked() && c.pair_id() != cards[first].pair_id())?;
    Some((first, second))
}

/// Waits for input, flips a known pair on consecutive frames, and waits for
/// the verification to finish. Returns the indices flipped.
pub fn match_one_pair(s: &mut Session) -> (usize, usize) {
    tick_until(s, 2_000, |s| {
        s.phase() == Phase::Playing && clickable_pair(s).is_some()
    });
    let (a, b) = clickable_pair(s).expect("pair available");
    assert!(touch_index(s, a));
    s.tick(DT);
    assert!(touch_index(s, b));
    assert_eq!(s.phase(), Phase::Checking);
    tick_until(s, 2_000, |s| s.phase() != Phase::Checking);
    (a, b)
}

pub fn phase_path(events: &[SessionEvent]) -> Vec<Phase> {
    events
        .iter()
        .filter_map(|e| match e {
            SessionEvent::PhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
        .collect()
}
