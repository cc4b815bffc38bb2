use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Total number of playable levels across all difficulty tiers.
pub const LEVEL_COUNT: u32 = 200;
/// Levels per difficulty tier; also the width of the local id range.
pub const LEVELS_PER_DIFFICULTY: u32 = 50;
/// No level ever gets less time than this, whatever the formula says.
pub const MIN_TIME_LIMIT_SECS: f32 = 15.0;

/// Difficulty tier, derived from `global_id / 50`.
/// Each tier carries its own time constants, grid shape, and reward row.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Difficulty {
    /// Levels 0..50
    Easy,
    /// Levels 50..100
    Normal,
    /// Levels 100..150
    Advanced,
    /// Levels 150..200
    Hard,
}

impl Difficulty {
    pub fn all() -> [Difficulty; 4] {
        [
            Difficulty::Easy,
            Difficulty::Normal,
            Difficulty::Advanced,
            Difficulty::Hard,
        ]
    }

    pub fn from_index(index: u32) -> Option<Difficulty> {
        match index {
            0 => Some(Difficulty::Easy),
            1 => Some(Difficulty::Normal),
            2 => Some(Difficulty::Advanced),
            3 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Advanced => "Advanced",
            Difficulty::Hard => "Hard",
        }
    }

    /// `(base, decay)` in seconds used by the time-limit formulas.
    pub fn time_constants(self) -> (f32, f32) {
        match self {
            Difficulty::Easy => (45.0, 1.5),
            Difficulty::Normal => (80.0, 2.0),
            Difficulty::Advanced => (120.0, 3.0),
            Difficulty::Hard => (150.0, 4.0),
        }
    }

    pub fn grid_shape(self) -> GridShape {
        match self {
            Difficulty::Easy => GridShape { cols: 3, rows: 4 },
            Difficulty::Normal => GridShape { cols: 4, rows: 4 },
            Difficulty::Advanced => GridShape { cols: 4, rows: 5 },
            Difficulty::Hard => GridShape { cols: 5, rows: 6 },
        }
    }

    pub fn reward_row(self) -> RewardRow {
        REWARD_TABLE[self.index()]
    }
}

/// Sub-range of a tier, chosen by fixed local-id bands.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum LevelRange {
    /// Local ids 1..=15: single grid, tightening clock
    Speed,
    /// Local ids 16..=30: two grids on one clock
    Endurance,
    /// Local ids 31..=40: single grid with periodic reshuffles
    Shuffle,
    /// Local ids 41..=50: two grids with reshuffles
    Mastery,
}

impl LevelRange {
    pub fn from_local_id(local_id: u32) -> LevelRange {
        match local_id {
            0..=15 => LevelRange::Speed,
            16..=30 => LevelRange::Endurance,
            31..=40 => LevelRange::Shuffle,
            _ => LevelRange::Mastery,
        }
    }

    pub fn grid_count(self) -> u32 {
        match self {
            LevelRange::Speed | LevelRange::Shuffle => 1,
            LevelRange::Endurance | LevelRange::Mastery => 2,
        }
    }

    pub fn shuffle_enabled(self) -> bool {
        matches!(self, LevelRange::Shuffle | LevelRange::Mastery)
    }

    pub fn name(self) -> &'static str {
        match self {
            LevelRange::Speed => "Speed",
            LevelRange::Endurance => "Endurance",
            LevelRange::Shuffle => "Shuffle",
            LevelRange::Mastery => "Mastery",
        }
    }
}

/// Column/row count of one grid. Always holds an even number of cells.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub cols: usize,
    pub rows: usize,
}

impl GridShape {
    pub fn cells(&self) -> usize {
        self.cols * self.rows
    }

    pub fn pair_count(&self) -> usize {
        self.cells() / 2
    }
}

/// Immutable description of one level, derived once from its global id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Global id in `0..200`
    pub global_id: u32,
    /// Position inside the tier, `1..=50`
    pub local_id: u32,
    pub difficulty: Difficulty,
    pub range: LevelRange,
    /// Countdown shared by every grid of the level, floored at 15 s
    pub time_limit_secs: f32,
    /// Grids to clear sequentially (1 or 2)
    pub grid_count: u32,
    pub shuffle_enabled: bool,
    /// Shape of each grid
    pub grid: GridShape,
}

impl LevelConfig {
    pub fn pairs_per_grid(&self) -> usize {
        self.grid.pair_count()
    }

    pub fn pairs_required_total(&self) -> usize {
        self.pairs_per_grid() * self.grid_count as usize
    }
}

/// Builds the [`LevelConfig`] for a global level id.
///
/// Ids outside `0..200` are rejected rather than wrapped.
///
/// # Examples
///
/// ```
/// use nekomemo_engine::level::{configure, Difficulty, LevelRange};
///
/// let first = configure(0).unwrap();
/// assert_eq!(first.difficulty, Difficulty::Easy);
/// assert_eq!(first.range, LevelRange::Speed);
/// assert_eq!(first.time_limit_secs, 45.0);
///
/// assert!(configure(200).is_err());
/// ```
pub fn configure(global_id: u32) -> Result<LevelConfig, EngineError> {
    let difficulty =
        Difficulty::from_index(global_id / LEVELS_PER_DIFFICULTY).ok_or(
            EngineError::InvalidLevelId {
                id: global_id,
                max: LEVEL_COUNT,
            },
        )?;
    let local_id = (global_id % LEVELS_PER_DIFFICULTY) + 1;
    let range = LevelRange::from_local_id(local_id);
    Ok(LevelConfig {
        global_id,
        local_id,
        difficulty,
        range,
        time_limit_secs: time_limit_for(difficulty, range, local_id),
        grid_count: range.grid_count(),
        shuffle_enabled: range.shuffle_enabled(),
        grid: difficulty.grid_shape(),
    })
}

/// Every level in id order.
pub fn all_levels() -> impl Iterator<Item = LevelConfig> {
    (0..LEVEL_COUNT).filter_map(|id| configure(id).ok())
}

pub fn time_limit_for(difficulty: Difficulty, range: LevelRange, local_id: u32) -> f32 {
    let (base, decay) = difficulty.time_constants();
    let raw = match range {
        LevelRange::Speed => base - local_id.saturating_sub(1) as f32 * decay,
        LevelRange::Endurance => base * 1.8 - local_id.saturating_sub(16) as f32 * decay,
        LevelRange::Shuffle => base * 1.25,
        LevelRange::Mastery => base * 2.3,
    };
    raw.max(MIN_TIME_LIMIT_SECS)
}

/// Stars earned from the fraction of the clock left at victory.
pub fn stars_for(time_remaining: f32, time_limit: f32) -> u8 {
    if time_limit <= 0.0 {
        return 1;
    }
    let ratio = time_remaining / time_limit;
    if ratio > 0.50 {
        3
    } else if ratio > 0.25 {
        2
    } else {
        1
    }
}

/// One row of the per-difficulty reward table.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RewardRow {
    /// Paid for any clear
    pub base: u32,
    /// Paid per star above the first
    pub per_star: u32,
    /// Paid once, on the first clear of a level
    pub first_clear: u32,
}

pub const REWARD_TABLE: [RewardRow; 4] = [
    RewardRow {
        base: 10,
        per_star: 10,
        first_clear: 50,
    },
    RewardRow {
        base: 20,
        per_star: 15,
        first_clear: 100,
    },
    RewardRow {
        base: 35,
        per_star: 20,
        first_clear: 150,
    },
    RewardRow {
        base: 50,
        per_star: 30,
        first_clear: 250,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_id_bands() {
        assert_eq!(LevelRange::from_local_id(1), LevelRange::Speed);
        assert_eq!(LevelRange::from_local_id(15), LevelRange::Speed);
        assert_eq!(LevelRange::from_local_id(16), LevelRange::Endurance);
        assert_eq!(LevelRange::from_local_id(30), LevelRange::Endurance);
        assert_eq!(LevelRange::from_local_id(31), LevelRange::Shuffle);
        assert_eq!(LevelRange::from_local_id(40), LevelRange::Shuffle);
        assert_eq!(LevelRange::from_local_id(41), LevelRange::Mastery);
        assert_eq!(LevelRange::from_local_id(50), LevelRange::Mastery);
    }

    #[test]
    fn speed_band_decays_per_level() {
        let a = configure(0).unwrap().time_limit_secs;
        let b = configure(1).unwrap().time_limit_secs;
        assert!((a - b - 1.5).abs() < 1e-4);
    }

    #[test]
    fn grid_shapes_are_even() {
        for d in Difficulty::all() {
            assert_eq!(d.grid_shape().cells() % 2, 0, "{:?}", d);
        }
    }

    #[test]
    fn zero_limit_gives_one_star() {
        assert_eq!(stars_for(10.0, 0.0), 1);
    }

    #[test]
    fn star_thresholds_are_strict() {
        assert_eq!(stars_for(50.0, 100.0), 2);
        assert_eq!(stars_for(25.0, 100.0), 1);
    }
}
