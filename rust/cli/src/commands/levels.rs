//! `levels` command: the level table as configured by the engine.
//!
//! # Example Output
//!
//! ```text
//!  id  difficulty  local  range      grid  grids  shuffle   time
//!   0  Easy            1  Speed      3x4       1  no        45.0
//! ```

use crate::error::CliError;
use nekomemo_engine::level::{Difficulty, LevelConfig, all_levels};
use std::io::Write;

/// Handle the levels command.
///
/// Lists every level, or only those of `difficulty`, as a text table or as a
/// pretty JSON array of level configs.
pub fn handle_levels_command(
    difficulty: Option<Difficulty>,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let levels: Vec<LevelConfig> = all_levels()
        .filter(|l| difficulty.is_none_or(|d| l.difficulty == d))
        .collect();

    if json {
        let json_str = serde_json::to_string_pretty(&levels).map_err(std::io::Error::other)?;
        writeln!(out, "{}", json_str)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>3}  {:<10}  {:>5}  {:<9}  {:<4}  {:>5}  {:<7}  {:>5}",
        "id", "difficulty", "local", "range", "grid", "grids", "shuffle", "time"
    )?;
    for level in &levels {
        writeln!(
            out,
            "{:>3}  {:<10}  {:>5}  {:<9}  {:<4}  {:>5}  {:<7}  {:>5.1}",
            level.global_id,
            level.difficulty.name(),
            level.local_id,
            level.range.name(),
            format!("{}x{}", level.grid.cols, level.grid.rows),
            level.grid_count,
            if level.shuffle_enabled { "yes" } else { "no" },
            level.time_limit_secs,
        )?;
    }
    Ok(())
}
