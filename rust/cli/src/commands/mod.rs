//! Command handler modules.
//!
//! Each subcommand lives in its own file with a consistent pattern:
//!
//! - Public handler function: `pub fn handle_COMMAND_command(...) -> Result<(), CliError>`
//! - Output streams (`&mut dyn Write`) passed as parameters
//! - Errors propagated via the `CliError` enum

pub mod cfg;
pub mod levels;
pub mod prices;
pub mod sim;

pub use cfg::handle_cfg_command;
pub use levels::handle_levels_command;
pub use prices::handle_prices_command;
pub use sim::{SimOptions, handle_sim_command};
