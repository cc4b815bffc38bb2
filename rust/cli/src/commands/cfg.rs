//! Configuration command handler.
//!
//! Displays the resolved configuration with the source of each value
//! (default, file, or environment).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "level": {
//!     "value": 0,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };
    write_resolved(&resolved, out)
}

fn write_resolved(resolved: &config::ConfigResolved, out: &mut dyn Write) -> Result<(), CliError> {
    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "level": {
            "value": config.level,
            "source": sources.level,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        },
        "bot": {
            "value": config.bot,
            "source": sources.bot,
        },
        "tuning": {
            "value": config.tuning,
            "source": sources.tuning,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
