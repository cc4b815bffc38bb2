use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::level::GridShape;

/// Timing and threshold knobs of a session.
///
/// Missing fields fall back to the defaults when deserialized, so a host
/// config file only has to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTuning {
    /// Forced face-up preview at the start of every grid
    pub preview_secs: f32,
    /// One half-turn of a card
    pub flip_secs: f32,
    /// Read time before a pending pair is judged
    pub check_delay_secs: f32,
    /// Input lock after a reshuffle
    pub shuffle_transition_secs: f32,
    /// Matches between reshuffles on shuffle-enabled levels
    pub shuffle_threshold: u32,
    pub time_attack_base_secs: f32,
    pub time_attack_secs_per_upgrade: f32,
    /// Added to the clock whenever a time-attack grid is cleared
    pub time_attack_grid_bonus_secs: f32,
    pub time_attack_grid: GridShape,
}

impl Default for SessionTuning {
    fn default() -> Self {
        Self {
            preview_secs: 2.0,
            flip_secs: 0.25,
            check_delay_secs: 0.6,
            shuffle_transition_secs: 0.5,
            shuffle_threshold: 3,
            time_attack_base_secs: 60.0,
            time_attack_secs_per_upgrade: 5.0,
            time_attack_grid_bonus_secs: 5.0,
            time_attack_grid: GridShape { cols: 3, rows: 4 },
        }
    }
}

impl SessionTuning {
    pub fn time_attack_limit(&self, upgrades: u32) -> f32 {
        self.time_attack_base_secs + upgrades as f32 * self.time_attack_secs_per_upgrade
    }

    /// Rejects values that would stall a session: a NaN or negative timer
    /// never reaches zero, and a zero threshold or odd grid cannot be played.
    pub fn validate(&self) -> Result<(), EngineError> {
        let durations = [
            ("preview_secs", self.preview_secs),
            ("flip_secs", self.flip_secs),
            ("check_delay_secs", self.check_delay_secs),
            ("shuffle_transition_secs", self.shuffle_transition_secs),
            ("time_attack_base_secs", self.time_attack_base_secs),
            ("time_attack_secs_per_upgrade", self.time_attack_secs_per_upgrade),
            ("time_attack_grid_bonus_secs", self.time_attack_grid_bonus_secs),
        ];
        if let Some((name, value)) = durations
            .iter()
            .find(|(_, d)| !d.is_finite() || *d < 0.0)
        {
            return Err(EngineError::InvalidTuning(format!(
                "{} must be a finite duration >= 0 (got {})",
                name, value
            )));
        }
        if self.shuffle_threshold == 0 {
            return Err(EngineError::InvalidTuning(
                "shuffle_threshold must be >= 1".into(),
            ));
        }
        let cells = self.time_attack_grid.cells();
        if cells == 0 || cells % 2 != 0 {
            return Err(EngineError::InvalidTuning(format!(
                "time_attack_grid {}x{} needs an even, non-zero cell count",
                self.time_attack_grid.cols, self.time_attack_grid.rows
            )));
        }
        Ok(())
    }
}
