//! The play-session state machine.
//!
//! A [`SessionController`] owns one [`SessionState`] and is driven by the
//! host through intents (`touch_card`, `pause`, `request_hint`, ...) and a
//! single per-frame [`SessionController::tick`]. Intents that do not apply in
//! the current phase are ignored and report `false`.

use std::collections::BTreeMap;

use rand::{seq::index, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::board::{self, BoardSpec, CardIdentity, Rect};
use crate::card::{Card, CardState};
use crate::economy::PowerKind;
use crate::errors::EngineError;
use crate::events::{Phase, SessionEvent};
use crate::level::{GridShape, LevelConfig};
use crate::notify::{ad_channel, AdInbox, AdRewardHandle, AdSignal, Notifier, Sound};
use crate::reward;
use crate::save::SaveStore;
use crate::tuning::SessionTuning;

/// Which game is being played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionMode {
    /// A numbered level: fixed clock, fixed number of grids
    Level(LevelConfig),
    /// Endless grids from the unlocked card pool until the clock runs out
    TimeAttack {
        /// Unlocked card ids captured when the session started
        pool: Vec<u32>,
    },
}

/// Host-side parameters that are not part of the level itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    /// Box the grid is centred in
    pub bounds: Rect,
    /// RNG seed; `None` draws a random one
    pub seed: Option<u64>,
    pub tuning: SessionTuning,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, 480.0, 800.0),
            seed: None,
            tuning: SessionTuning::default(),
        }
    }
}

/// How a finished session ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    Won {
        stars: u8,
        level_reward: u32,
        coin_bonus: u32,
        total: u32,
        is_first_clear: bool,
    },
    Lost {
        pairs_found: u32,
        pairs_required: u32,
    },
    TimeAttack {
        grids_completed: u32,
        coin_bonus: u32,
        reward: u32,
        doubled: bool,
    },
}

/// Everything that changes during one session. Read-only to the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    pub phase: Phase,
    pub mode: SessionMode,
    pub current_grid_index: u32,
    /// Cards of the current grid only; replaced wholesale on grid advance
    pub cards: Vec<Card>,
    pub pairs_found_in_grid: u32,
    pub pairs_found_total: u32,
    pub matches_since_shuffle: u32,
    pub grids_completed: u32,
    pub time_limit: f32,
    pub time_remaining: f32,
    pub is_time_frozen: bool,
    pub freeze_remaining: f32,
    pub coin_bonus_accrued: u32,
    pub move_count: u32,
    pub first_revealed: Option<usize>,
    pub second_revealed: Option<usize>,
    /// Countdown of the preview, verification delay, or shuffle lock
    pub phase_timer: f32,
    pub outcome: Option<SessionOutcome>,
}

impl SessionState {
    fn fresh(mode: SessionMode, time_limit: f32, cards: Vec<Card>) -> Self {
        Self {
            phase: Phase::Starting,
            mode,
            current_grid_index: 0,
            cards,
            pairs_found_in_grid: 0,
            pairs_found_total: 0,
            matches_since_shuffle: 0,
            grids_completed: 0,
            time_limit,
            time_remaining: time_limit,
            is_time_frozen: false,
            freeze_remaining: 0.0,
            coin_bonus_accrued: 0,
            move_count: 0,
            first_revealed: None,
            second_revealed: None,
            phase_timer: 0.0,
            outcome: None,
        }
    }

    /// Cards flipped by the player and not yet judged (0, 1 or 2).
    pub fn pending_count(&self) -> usize {
        self.first_revealed.is_some() as usize + self.second_revealed.is_some() as usize
    }
}

/// Drives one play session. Owns the session state and the injected
/// save and notification collaborators.
///
/// # Examples
///
/// ```
/// use nekomemo_engine::events::Phase;
/// use nekomemo_engine::level::configure;
/// use nekomemo_engine::notify::NullNotifier;
/// use nekomemo_engine::save::MemorySave;
/// use nekomemo_engine::session::{SessionController, SessionOptions};
///
/// let options = SessionOptions { seed: Some(3), ..SessionOptions::default() };
/// let mut session = SessionController::new(
///     configure(0).unwrap(),
///     MemorySave::default(),
///     NullNotifier,
///     options,
/// )
/// .unwrap();
/// assert_eq!(session.phase(), Phase::Starting);
///
/// // run past the preview
/// for _ in 0..180 {
///     session.tick(1.0 / 60.0);
/// }
/// assert_eq!(session.phase(), Phase::Playing);
/// ```
#[derive(Debug)]
pub struct SessionController<S: SaveStore, N: Notifier> {
    state: SessionState,
    save: S,
    notifier: N,
    tuning: SessionTuning,
    bounds: Rect,
    seed: u64,
    rng: ChaCha20Rng,
    events: Vec<SessionEvent>,
    /// At most one flip is accepted between two ticks
    flip_taken_this_frame: bool,
    ad_handle: AdRewardHandle,
    ad_inbox: AdInbox,
    double_reward: bool,
}

impl<S: SaveStore, N: Notifier> SessionController<S, N> {
    /// Starts a session on a numbered level.
    pub fn new(
        level: LevelConfig,
        save: S,
        notifier: N,
        options: SessionOptions,
    ) -> Result<Self, EngineError> {
        Self::with_mode(SessionMode::Level(level), save, notifier, options)
    }

    /// Starts a time-attack run over the save's unlocked cards.
    pub fn time_attack(save: S, notifier: N, options: SessionOptions) -> Result<Self, EngineError> {
        let pool = unique_pool(save.get_active_cards());
        Self::with_mode(SessionMode::TimeAttack { pool }, save, notifier, options)
    }

    fn with_mode(
        mode: SessionMode,
        save: S,
        notifier: N,
        options: SessionOptions,
    ) -> Result<Self, EngineError> {
        options.tuning.validate()?;
        let seed = options.seed.unwrap_or_else(rand::random);
        let (ad_handle, ad_inbox) = ad_channel();
        let mut controller = Self {
            state: SessionState::fresh(mode.clone(), 0.0, Vec::new()),
            save,
            notifier,
            tuning: options.tuning,
            bounds: options.bounds,
            seed,
            rng: ChaCha20Rng::seed_from_u64(seed),
            events: Vec::new(),
            flip_taken_this_frame: false,
            ad_handle,
            ad_inbox,
            double_reward: false,
        };
        controller.reset(mode)?;
        Ok(controller)
    }

    /// Throws the current session away and starts `level` from scratch with
    /// the same collaborators. On error the previous session is left as is.
    pub fn restart(&mut self, level: LevelConfig) -> Result<(), EngineError> {
        self.reset(SessionMode::Level(level))
    }

    pub fn restart_time_attack(&mut self) -> Result<(), EngineError> {
        let pool = unique_pool(self.save.get_active_cards());
        self.reset(SessionMode::TimeAttack { pool })
    }

    fn reset(&mut self, mode: SessionMode) -> Result<(), EngineError> {
        let time_limit = match &mode {
            SessionMode::Level(level) => level.time_limit_secs,
            SessionMode::TimeAttack { .. } => self
                .tuning
                .time_attack_limit(self.save.get_time_attack_upgrade_count()),
        };
        let cards = self.build_grid(&mode)?;
        tracing::debug!(seed = self.seed, mode = ?mode, time_limit, "session started");
        self.state = SessionState::fresh(mode, time_limit, cards);
        self.events.clear();
        self.flip_taken_this_frame = false;
        self.double_reward = false;
        // signals meant for the discarded session
        let _ = self.ad_inbox.drain();
        self.enter_starting();
        Ok(())
    }

    /// Ends the session and hands the collaborators back.
    pub fn exit(self) -> (S, N) {
        tracing::debug!(phase = ?self.state.phase, "session exited");
        (self.save, self.notifier)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }
    pub fn phase(&self) -> Phase {
        self.state.phase
    }
    pub fn cards(&self) -> &[Card] {
        &self.state.cards
    }
    pub fn outcome(&self) -> Option<&SessionOutcome> {
        self.state.outcome.as_ref()
    }
    pub fn save(&self) -> &S {
        &self.save
    }
    pub fn notifier(&self) -> &N {
        &self.notifier
    }
    pub fn seed(&self) -> u64 {
        self.seed
    }
    pub fn tuning(&self) -> &SessionTuning {
        &self.tuning
    }

    /// Handle for the ad SDK callback. Signals are applied on the next tick.
    pub fn ad_reward_handle(&self) -> AdRewardHandle {
        self.ad_handle.clone()
    }

    /// Events produced since the previous call, oldest first.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pairs_per_grid(&self) -> u32 {
        self.grid_shape(&self.state.mode).pair_count() as u32
    }

    /// Whether the two pending cards form a pair. `None` unless two are pending.
    /// Reads only; calling it repeatedly gives the same answer.
    pub fn check_for_match(&self) -> Option<bool> {
        let a = self.state.first_revealed?;
        let b = self.state.second_revealed?;
        Some(self.state.cards[a].pair_id() == self.state.cards[b].pair_id())
    }

    /// Advances the session by `dt` seconds. Cards animate first, then the
    /// phase logic runs against the settled cards.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.flip_taken_this_frame = false;
        self.apply_ad_signals();

        if self.state.phase == Phase::Paused {
            return;
        }
        for card in &mut self.state.cards {
            card.update(dt);
        }

        match self.state.phase {
            Phase::Starting => {
                self.state.phase_timer -= dt;
                let settled = !self.state.cards.iter().any(Card::is_animating);
                if self.state.phase_timer <= 0.0 && settled {
                    for card in &mut self.state.cards {
                        card.flip_back();
                    }
                    self.set_phase(Phase::Playing);
                }
            }
            Phase::Playing => {
                self.advance_clock(dt);
            }
            Phase::Checking => {
                if self.advance_clock(dt) {
                    return;
                }
                self.state.phase_timer -= dt;
                if self.state.phase_timer <= 0.0 && self.pending_settled() {
                    self.resolve_check();
                }
            }
            Phase::Shuffling => {
                self.state.phase_timer -= dt;
                if self.state.phase_timer <= 0.0 {
                    self.set_phase(Phase::Playing);
                }
            }
            Phase::Paused | Phase::Victory | Phase::Defeat => {}
        }
    }

    /// Flips the hidden card under `(x, y)`. Returns whether a flip happened.
    pub fn touch_card(&mut self, x: f32, y: f32) -> bool {
        if self.state.phase != Phase::Playing
            || self.flip_taken_this_frame
            || self.state.pending_count() >= 2
        {
            return false;
        }
        let Some(index) = self
            .state
            .cards
            .iter()
            .position(|c| c.can_be_clicked() && c.contains(x, y))
        else {
            return false;
        };

        let card = &mut self.state.cards[index];
        card.flip();
        let pair_id = card.pair_id();
        self.flip_taken_this_frame = true;
        self.state.move_count += 1;
        self.events.push(SessionEvent::CardFlipped { index, pair_id });
        self.notifier.play_sound(Sound::Flip);

        if self.state.first_revealed.is_none() {
            self.state.first_revealed = Some(index);
        } else {
            self.state.second_revealed = Some(index);
            self.state.phase_timer = self.tuning.check_delay_secs;
            self.set_phase(Phase::Checking);
        }
        true
    }

    pub fn pause(&mut self) -> bool {
        if self.state.phase != Phase::Playing {
            return false;
        }
        self.set_phase(Phase::Paused);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.state.phase != Phase::Paused {
            return false;
        }
        self.set_phase(Phase::Playing);
        true
    }

    /// Spends one hint to point out an unmatched, fully hidden pair.
    pub fn request_hint(&mut self) -> bool {
        if self.state.phase != Phase::Playing || self.state.pending_count() > 0 {
            return false;
        }
        let Some((first, second)) = self.hintable_pair() else {
            return false;
        };
        if !self.save.consume_power(PowerKind::Hint) {
            tracing::debug!("hint requested without stock");
            return false;
        }
        self.events.push(SessionEvent::HintShown { first, second });
        self.notifier.play_sound(Sound::Hint);
        true
    }

    /// Spends one time freeze to stop the clock for `seconds`.
    pub fn request_time_freeze(&mut self, seconds: f32) -> bool {
        if !matches!(self.state.phase, Phase::Playing | Phase::Checking)
            || !(seconds.is_finite() && seconds > 0.0)
        {
            return false;
        }
        if !self.save.consume_power(PowerKind::TimeFreeze) {
            tracing::debug!("time freeze requested without stock");
            return false;
        }
        self.state.is_time_frozen = true;
        self.state.freeze_remaining += seconds;
        self.events.push(SessionEvent::TimeFrozen { seconds });
        self.notifier.play_sound(Sound::Freeze);
        true
    }

    fn grid_shape(&self, mode: &SessionMode) -> GridShape {
        match mode {
            SessionMode::Level(level) => level.grid,
            SessionMode::TimeAttack { .. } => self.tuning.time_attack_grid,
        }
    }

    fn build_grid(&mut self, mode: &SessionMode) -> Result<Vec<Card>, EngineError> {
        let spec = BoardSpec::for_grid(self.grid_shape(mode), self.bounds);
        let identity = match mode {
            SessionMode::Level(_) => CardIdentity::Deck,
            SessionMode::TimeAttack { pool } => {
                if pool.len() < spec.pair_count {
                    return Err(EngineError::InsufficientCardPool {
                        needed: spec.pair_count,
                        available: pool.len(),
                    });
                }
                let picked = index::sample(&mut self.rng, pool.len(), spec.pair_count);
                CardIdentity::Pool(picked.iter().map(|i| pool[i]).collect())
            }
        };
        let save = &self.save;
        let mut cards = board::generate(
            &spec,
            &identity,
            |card_id| save.get_card_coin_value(card_id),
            &mut self.rng,
        )?;
        for card in &mut cards {
            card.set_flip_secs(self.tuning.flip_secs);
        }
        Ok(cards)
    }

    fn set_phase(&mut self, to: Phase) {
        let from = self.state.phase;
        if from == to {
            return;
        }
        self.state.phase = to;
        tracing::debug!(?from, ?to, "phase changed");
        self.events.push(SessionEvent::PhaseChanged { from, to });
    }

    fn enter_starting(&mut self) {
        for card in &mut self.state.cards {
            card.flip();
        }
        self.state.phase_timer = self.tuning.preview_secs;
        self.set_phase(Phase::Starting);
    }

    /// Runs the countdown. Returns true when it ran out and ended the session.
    fn advance_clock(&mut self, dt: f32) -> bool {
        if self.state.is_time_frozen {
            self.state.freeze_remaining -= dt;
            if self.state.freeze_remaining <= 0.0 {
                self.state.freeze_remaining = 0.0;
                self.state.is_time_frozen = false;
            }
            return false;
        }
        self.state.time_remaining -= dt;
        if self.state.time_remaining > 0.0 {
            return false;
        }
        self.state.time_remaining = 0.0;
        self.finish_defeat();
        true
    }

    fn pending_settled(&self) -> bool {
        [self.state.first_revealed, self.state.second_revealed]
            .iter()
            .all(|slot| match slot {
                Some(i) => self.state.cards[*i].state() == CardState::Revealed,
                None => true,
            })
    }

    fn resolve_check(&mut self) {
        let is_match = self.check_for_match();
        let pending = (
            self.state.first_revealed.take(),
            self.state.second_revealed.take(),
        );
        let (Some(first), Some(second), Some(is_match)) = (pending.0, pending.1, is_match) else {
            self.set_phase(Phase::Playing);
            return;
        };

        if !is_match {
            self.state.cards[first].flip_back();
            self.state.cards[second].flip_back();
            self.events
                .push(SessionEvent::PairMismatched { first, second });
            self.notifier.play_sound(Sound::Mismatch);
            self.set_phase(Phase::Playing);
            return;
        }

        self.state.cards[first].set_matched();
        self.state.cards[second].set_matched();
        let coin_value = self.state.cards[first].coin_value();
        self.state.coin_bonus_accrued = self.state.coin_bonus_accrued.saturating_add(coin_value);
        self.state.pairs_found_in_grid += 1;
        self.state.pairs_found_total += 1;
        self.state.matches_since_shuffle += 1;
        self.events.push(SessionEvent::PairMatched {
            first,
            second,
            coin_value,
        });
        self.notifier.play_sound(Sound::Match);

        let shuffle_enabled = match &self.state.mode {
            SessionMode::Level(level) => level.shuffle_enabled,
            SessionMode::TimeAttack { .. } => false,
        };
        if self.state.pairs_found_in_grid >= self.pairs_per_grid() {
            self.complete_grid();
        } else if shuffle_enabled && self.state.matches_since_shuffle >= self.tuning.shuffle_threshold
        {
            self.start_shuffle();
        } else {
            self.set_phase(Phase::Playing);
        }
    }

    fn start_shuffle(&mut self) {
        let moved = board::shuffle_positions(&mut self.state.cards, &mut self.rng);
        self.state.matches_since_shuffle = 0;
        self.state.phase_timer = self.tuning.shuffle_transition_secs;
        self.set_phase(Phase::Shuffling);
        self.events.push(SessionEvent::GridShuffled { moved });
        self.notifier.play_sound(Sound::Shuffle);
    }

    fn complete_grid(&mut self) {
        self.state.grids_completed += 1;
        let last_grid = match &self.state.mode {
            SessionMode::Level(level) => self.state.current_grid_index + 1 >= level.grid_count,
            SessionMode::TimeAttack { .. } => false,
        };
        if last_grid {
            self.finish_victory();
            return;
        }
        if matches!(self.state.mode, SessionMode::TimeAttack { .. }) {
            self.state.time_remaining += self.tuning.time_attack_grid_bonus_secs;
        }

        let mode = self.state.mode.clone();
        match self.build_grid(&mode) {
            Ok(cards) => self.state.cards = cards,
            Err(e) => {
                tracing::error!(error = %e, "could not build next grid");
                self.finish_defeat();
                return;
            }
        }
        self.state.current_grid_index += 1;
        self.state.pairs_found_in_grid = 0;
        self.state.matches_since_shuffle = 0;
        self.state.first_revealed = None;
        self.state.second_revealed = None;
        self.events.push(SessionEvent::GridAdvanced {
            grid_index: self.state.current_grid_index,
        });
        self.notifier.play_sound(Sound::GridClear);
        self.enter_starting();
    }

    fn finish_victory(&mut self) {
        let SessionMode::Level(level) = &self.state.mode else {
            return;
        };
        let level_id = level.global_id;
        let is_first_clear = !self.save.is_level_completed(level_id);
        let r = reward::calculate(level, self.state.time_remaining, is_first_clear);
        let coin_bonus = self.state.coin_bonus_accrued;
        let total = r.reward.saturating_add(coin_bonus);

        self.save.set_level_completed(level_id, r.stars);
        self.save.add_nekoins(total);

        self.state.outcome = Some(SessionOutcome::Won {
            stars: r.stars,
            level_reward: r.reward,
            coin_bonus,
            total,
            is_first_clear,
        });
        self.set_phase(Phase::Victory);
        self.events.push(SessionEvent::SessionWon {
            stars: r.stars,
            level_reward: r.reward,
            coin_bonus,
            total,
            is_first_clear,
        });
        self.notifier.play_sound(Sound::Victory);
        tracing::info!(
            level_id,
            stars = r.stars,
            total,
            moves = self.state.move_count,
            "session won"
        );
    }

    fn finish_defeat(&mut self) {
        let pairs_found = self.state.pairs_found_total;
        let pairs_required = match &self.state.mode {
            SessionMode::Level(level) => level.pairs_required_total() as u32,
            SessionMode::TimeAttack { .. } => {
                (self.state.grids_completed + 1) * self.pairs_per_grid()
            }
        };
        self.set_phase(Phase::Defeat);
        self.events.push(SessionEvent::SessionLost {
            pairs_found,
            pairs_required,
        });

        if matches!(self.state.mode, SessionMode::TimeAttack { .. }) {
            let base = reward::time_attack_reward(
                self.state.grids_completed,
                self.state.coin_bonus_accrued,
            );
            let doubled = self.double_reward;
            let paid = if doubled { base.saturating_mul(2) } else { base };
            self.save.add_nekoins(paid);
            self.state.outcome = Some(SessionOutcome::TimeAttack {
                grids_completed: self.state.grids_completed,
                coin_bonus: self.state.coin_bonus_accrued,
                reward: paid,
                doubled,
            });
            self.events.push(SessionEvent::TimeAttackFinished {
                grids_completed: self.state.grids_completed,
                coin_bonus: self.state.coin_bonus_accrued,
                reward: paid,
                doubled,
            });
            tracing::info!(
                grids = self.state.grids_completed,
                reward = paid,
                doubled,
                "time attack finished"
            );
        } else {
            self.state.outcome = Some(SessionOutcome::Lost {
                pairs_found,
                pairs_required,
            });
            tracing::info!(pairs_found, pairs_required, "session lost");
        }
        self.notifier.play_sound(Sound::Defeat);
    }

    fn apply_ad_signals(&mut self) {
        for signal in self.ad_inbox.drain() {
            match signal {
                AdSignal::Cancelled => tracing::debug!("ad reward cancelled"),
                AdSignal::Earned => self.apply_ad_reward(),
            }
        }
    }

    fn apply_ad_reward(&mut self) {
        if !matches!(self.state.mode, SessionMode::TimeAttack { .. }) || self.double_reward {
            tracing::debug!("ad reward ignored");
            return;
        }
        self.double_reward = true;

        // already paid out once: add the missing half now
        if let Some(SessionOutcome::TimeAttack {
            reward, doubled, ..
        }) = self.state.outcome.as_mut()
        {
            let bonus = *reward;
            *reward = reward.saturating_mul(2);
            *doubled = true;
            self.save.add_nekoins(bonus);
            self.events.push(SessionEvent::RewardDoubled { bonus });
        }
    }

    fn hintable_pair(&self) -> Option<(usize, usize)> {
        let mut by_pair: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (i, card) in self.state.cards.iter().enumerate() {
            by_pair.entry(card.pair_id()).or_default().push(i);
        }
        by_pair.into_values().find_map(|idx| match idx.as_slice() {
            [a, b] if self.state.cards[*a].can_be_clicked() && self.state.cards[*b].can_be_clicked() => {
                Some((*a, *b))
            }
            _ => None,
        })
    }
}

fn unique_pool(mut cards: Vec<u32>) -> Vec<u32> {
    let mut seen = std::collections::HashSet::new();
    cards.retain(|id| seen.insert(*id));
    cards
}
