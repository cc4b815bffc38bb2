use serde::{Deserialize, Serialize};

/// Top-level state of a play session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Forced preview of the whole grid
    Starting,
    /// Clock running, accepting touches
    Playing,
    /// Two cards face up, waiting out the verification delay
    Checking,
    /// Unmatched cards being repositioned
    Shuffling,
    /// Timers and input suspended
    Paused,
    /// Every grid cleared (terminal)
    Victory,
    /// Clock ran out (terminal)
    Defeat,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat)
    }
}

/// Notifications a session produces for its host, drained once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    CardFlipped {
        index: usize,
        pair_id: u32,
    },
    PairMatched {
        first: usize,
        second: usize,
        coin_value: u32,
    },
    PairMismatched {
        first: usize,
        second: usize,
    },
    GridShuffled {
        moved: usize,
    },
    GridAdvanced {
        grid_index: u32,
    },
    HintShown {
        first: usize,
        second: usize,
    },
    TimeFrozen {
        seconds: f32,
    },
    SessionWon {
        stars: u8,
        level_reward: u32,
        coin_bonus: u32,
        total: u32,
        is_first_clear: bool,
    },
    SessionLost {
        pairs_found: u32,
        pairs_required: u32,
    },
    TimeAttackFinished {
        grids_completed: u32,
        coin_bonus: u32,
        reward: u32,
        doubled: bool,
    },
    RewardDoubled {
        bonus: u32,
    },
}
