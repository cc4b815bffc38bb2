use thiserror::Error;

/// Failures raised while configuring a level or materializing a board.
///
/// Illegal player intents are never errors; they are silent no-ops on the
/// session controller. Only conditions that would leave a session unable to
/// start surface here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid level id: {id} (expected 0..{max})")]
    InvalidLevelId { id: u32, max: u32 },
    #[error("Board needs at least one pair")]
    ZeroPairs,
    #[error("Grid {cols}x{rows} has an odd number of cells")]
    OddGrid { cols: usize, rows: usize },
    #[error("Grid {cols}x{rows} cannot hold {pairs} pairs")]
    GridMismatch {
        cols: usize,
        rows: usize,
        pairs: usize,
    },
    #[error("Board bounds must have a positive width and height")]
    EmptyBounds,
    #[error("Card pool too small: need {needed} cards, have {available}")]
    InsufficientCardPool { needed: usize, available: usize },
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}
