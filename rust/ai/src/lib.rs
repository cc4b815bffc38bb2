//! # nekomemo-ai: Automated Players for Pair-Matching Sessions
//!
//! Bots that drive a [`SessionController`] the way a player would: they only
//! see what is face up, remember some of it, and touch one card per frame.
//! Used by the simulator and for balancing level clocks.
//!
//! ## Core Components
//!
//! - [`AutoPlayer`] - Trait every bot implements
//! - [`CardView`] - What a player can see of one card
//! - [`memory`] - Bots with perfect, partial, or no memory
//! - [`create_player`] - Factory by name
//! - [`play_session`] - Runs a session to its end with a bot
//!
//! ## Quick Start
//!
//! ```rust
//! use nekomemo_ai::{create_player, play_session};
//! use nekomemo_engine::level::configure;
//! use nekomemo_engine::notify::NullNotifier;
//! use nekomemo_engine::save::MemorySave;
//! use nekomemo_engine::session::{SessionController, SessionOptions};
//!
//! let mut session = SessionController::new(
//!     configure(0).unwrap(),
//!     MemorySave::default(),
//!     NullNotifier,
//!     SessionOptions { seed: Some(42), ..SessionOptions::default() },
//! )
//! .unwrap();
//! let mut bot = create_player("perfect", 42).expect("known player");
//! let report = play_session(&mut session, bot.as_mut(), 1.0 / 60.0, 10_000);
//! assert!(report.finished);
//! ```
//!
//! ## Player Types
//!
//! - `"perfect"` - Remembers every face it has seen
//! - `"forgetful"` - Remembers each face with probability 0.5
//! - `"random"` - Remembers nothing

use nekomemo_engine::board::Rect;
use nekomemo_engine::card::{Card, CardState};
use nekomemo_engine::events::Phase;
use nekomemo_engine::notify::Notifier;
use nekomemo_engine::save::SaveStore;
use nekomemo_engine::session::SessionController;

pub mod memory;

/// One card as a player sees it. The face is only known while it is turned up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardView {
    pub index: usize,
    pub rect: Rect,
    pub state: CardState,
    /// Pair id, visible only while the card is face up
    pub face: Option<u32>,
}

impl CardView {
    pub fn is_clickable(&self) -> bool {
        self.state == CardState::Hidden
    }

    /// Flipped by the player and not yet judged.
    pub fn is_open(&self) -> bool {
        matches!(self.state, CardState::FlippingToFront | CardState::Revealed)
    }
}

/// Player's-eye view of a board.
pub fn view_of(cards: &[Card]) -> Vec<CardView> {
    cards
        .iter()
        .enumerate()
        .map(|(index, card)| CardView {
            index,
            rect: card.rect(),
            state: card.state(),
            face: card.is_face_up().then(|| card.pair_id()),
        })
        .collect()
}

/// Interface for automated players.
///
/// `observe` is called every frame, including the preview. `choose` is only
/// called while the session accepts touches and returns the index to flip.
pub trait AutoPlayer: Send {
    fn observe(&mut self, _view: &[CardView]) {}

    fn choose(&mut self, view: &[CardView]) -> Option<usize>;

    fn name(&self) -> &str;
}

/// Builds a player by type name. Returns `None` for unknown names.
///
/// ```rust
/// use nekomemo_ai::create_player;
///
/// let bot = create_player("forgetful", 1).unwrap();
/// assert_eq!(bot.name(), "forgetful");
/// assert!(create_player("psychic", 1).is_none());
/// ```
pub fn create_player(kind: &str, seed: u64) -> Option<Box<dyn AutoPlayer>> {
    let bot = match kind {
        "perfect" => memory::MemoryBot::new("perfect", 1.0, seed),
        "forgetful" => memory::MemoryBot::new("forgetful", 0.5, seed),
        "random" => memory::MemoryBot::new("random", 0.0, seed),
        _ => return None,
    };
    Some(Box::new(bot))
}

/// Names accepted by [`create_player`].
pub const PLAYER_KINDS: [&str; 3] = ["perfect", "forgetful", "random"];

/// What happened while a bot played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayReport {
    pub ticks: usize,
    pub touches: u32,
    /// Whether the session reached Victory or Defeat within the tick budget
    pub finished: bool,
}

/// Drives `session` with `bot` at a fixed frame step until it ends or
/// `max_ticks` frames have run.
pub fn play_session<S, N>(
    session: &mut SessionController<S, N>,
    bot: &mut dyn AutoPlayer,
    dt: f32,
    max_ticks: usize,
) -> PlayReport
where
    S: SaveStore,
    N: Notifier,
{
    let mut report = PlayReport {
        ticks: 0,
        touches: 0,
        finished: session.phase().is_terminal(),
    };
    while !report.finished && report.ticks < max_ticks {
        let view = view_of(session.cards());
        bot.observe(&view);
        if session.phase() == Phase::Playing {
            if let Some(index) = bot.choose(&view) {
                let (x, y) = view[index].rect.center();
                if session.touch_card(x, y) {
                    report.touches += 1;
                }
            }
        }
        session.tick(dt);
        report.ticks += 1;
        report.finished = session.phase().is_terminal();
    }
    tracing::debug!(
        bot = bot.name(),
        ticks = report.ticks,
        touches = report.touches,
        finished = report.finished,
        "bot run ended"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use nekomemo_engine::level::configure;
    use nekomemo_engine::notify::NullNotifier;
    use nekomemo_engine::save::MemorySave;
    use nekomemo_engine::session::{SessionOptions, SessionOutcome};

    fn session(level: u32, seed: u64) -> SessionController<MemorySave, NullNotifier> {
        SessionController::new(
            configure(level).unwrap(),
            MemorySave::default(),
            NullNotifier,
            SessionOptions {
                seed: Some(seed),
                ..SessionOptions::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn view_hides_faces_of_hidden_cards() {
        let mut s = session(0, 1);
        assert!(view_of(s.cards()).iter().all(|v| v.face.is_some()));
        for _ in 0..200 {
            s.tick(1.0 / 60.0);
        }
        assert_eq!(s.phase(), Phase::Playing);
        let view = view_of(s.cards());
        assert!(view.iter().all(|v| v.face.is_none()));
        assert!(view.iter().all(|v| v.is_clickable() || !v.is_open()));
    }

    #[test]
    fn factory_knows_every_kind() {
        for kind in PLAYER_KINDS {
            assert_eq!(create_player(kind, 0).unwrap().name(), kind);
        }
        assert!(create_player("", 0).is_none());
    }

    #[test]
    fn perfect_player_never_misses() {
        let mut s = session(0, 9);
        let mut bot = create_player("perfect", 9).unwrap();
        let report = play_session(&mut s, bot.as_mut(), 1.0 / 60.0, 20_000);
        assert!(report.finished);
        assert_eq!(report.touches, 12);
        assert!(matches!(
            s.outcome(),
            Some(SessionOutcome::Won { stars: 3, .. })
        ));
    }

    #[test]
    fn random_player_finishes_one_way_or_another() {
        let mut s = session(150, 3);
        let mut bot = create_player("random", 3).unwrap();
        let report = play_session(&mut s, bot.as_mut(), 1.0 / 60.0, 60 * 400);
        assert!(report.finished);
        assert!(s.phase().is_terminal());
    }

    #[test]
    fn budget_stops_an_unfinished_run() {
        let mut s = session(0, 2);
        let mut bot = create_player("perfect", 2).unwrap();
        let report = play_session(&mut s, bot.as_mut(), 1.0 / 60.0, 10);
        assert_eq!(report.ticks, 10);
        assert!(!report.finished);
    }
}
