//! Command-line surface, parsed with clap derive.

use clap::{Parser, Subcommand, ValueEnum};
use nekomemo_engine::level::Difficulty;

#[derive(Parser, Debug)]
#[command(
    name = "nekomemo",
    version,
    about = "Headless host for the nekomemo pair-matching engine"
)]
pub struct NekomemoCli {
    /// Log engine internals at debug level (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the configured level table
    Levels {
        #[arg(long, value_enum)]
        difficulty: Option<DifficultyArg>,
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
    },
    /// Print the escalating shop prices
    Prices {
        /// Number of gacha and upgrade steps to list
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=1000))]
        count: u32,
    },
    /// Play sessions with an automated player
    Sim {
        /// Global level id (0..200); falls back to the configured level
        #[arg(long)]
        level: Option<u32>,
        #[arg(long, default_value_t = 1)]
        sessions: u32,
        #[arg(long)]
        seed: Option<u64>,
        /// perfect, forgetful, or random
        #[arg(long)]
        bot: Option<String>,
        /// Append one JSONL record per session to this file
        #[arg(long)]
        output: Option<String>,
        /// Play time-attack runs instead of a level
        #[arg(long)]
        time_attack: bool,
        /// Time-attack upgrades owned by the simulated save
        #[arg(long, default_value_t = 0)]
        upgrades: u32,
    },
    /// Show the resolved configuration and where each value came from
    Cfg,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum DifficultyArg {
    Easy,
    Normal,
    Advanced,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(arg: DifficultyArg) -> Self {
        match arg {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Advanced => Difficulty::Advanced,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}
