//! Simulation command: bot-driven sessions at a fixed 60 Hz frame step.
//!
//! All sessions of one run share a single in-memory save, so the first
//! victory on a level is a first clear and later ones are not. Each session
//! `i` runs on seed `base_seed + i`.
//!
//! # Environment Variables
//!
//! - `NEKOMEMO_SIM_BREAK_AFTER`: Stop after N sessions as if interrupted (for testing)
//!
//! # Examples
//!
//! ```no_run
//! use nekomemo_cli::commands::sim::{SimOptions, handle_sim_command};
//! use std::io;
//!
//! let opts = SimOptions {
//!     level: Some(17),
//!     sessions: 20,
//!     seed: Some(42),
//!     output: Some("data/sim.jsonl".to_string()),
//!     ..SimOptions::default()
//! };
//! handle_sim_command(&opts, &mut io::stdout(), &mut io::stderr()).unwrap();
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use nekomemo_ai::{create_player, play_session};
use nekomemo_engine::level::configure;
use nekomemo_engine::logger::{SessionLogger, SessionRecord};
use nekomemo_engine::notify::NullNotifier;
use nekomemo_engine::save::{MemorySave, SaveStore};
use nekomemo_engine::session::{SessionController, SessionOptions, SessionOutcome};
use std::io::Write;

/// Frame step of simulated sessions.
pub const SIM_DT: f32 = 1.0 / 60.0;

/// Game-time budget per session before it is reported unfinished (30 minutes).
pub const SIM_MAX_TICKS: usize = 60 * 60 * 30;

#[derive(Debug, Clone, Default)]
pub struct SimOptions {
    pub level: Option<u32>,
    pub sessions: u32,
    pub seed: Option<u64>,
    pub bot: Option<String>,
    pub output: Option<String>,
    pub time_attack: bool,
    pub upgrades: u32,
}

#[derive(Debug, Default)]
struct Tally {
    won: u32,
    lost: u32,
    unfinished: u32,
    stars: u32,
    nekoins: u64,
    grids: u32,
}

/// Handle the sim command.
///
/// Falls back to the resolved configuration for the level, seed, bot kind,
/// and tuning when the options leave them unset.
///
/// # Errors
///
/// - `CliError::InvalidInput` for zero sessions or an unknown bot
/// - `CliError::Engine` for an invalid level id or an unplayable time-attack pool
/// - `CliError::Interrupted` when `NEKOMEMO_SIM_BREAK_AFTER` stops the run early
pub fn handle_sim_command(
    opts: &SimOptions,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    if opts.sessions == 0 {
        ui::write_error(err, "sessions must be >= 1")?;
        return Err(CliError::InvalidInput("sessions must be >= 1".to_string()));
    }

    let resolved = config::load_with_sources().map_err(|e| {
        let _ = ui::write_error(err, &format!("Invalid configuration: {}", e));
        CliError::Config(e.to_string())
    })?;
    let cfg = resolved.config;

    let level = configure(opts.level.unwrap_or(cfg.level))?;
    let bot_kind = opts
        .bot
        .clone()
        .unwrap_or_else(|| cfg.bot.clone())
        .to_ascii_lowercase();
    if create_player(&bot_kind, 0).is_none() {
        return Err(CliError::InvalidInput(format!("unknown bot: {}", bot_kind)));
    }
    let base_seed = opts.seed.or(cfg.seed).unwrap_or_else(rand::random);

    let mut logger = match &opts.output {
        Some(path) => Some(SessionLogger::create(path).map_err(|e| {
            let _ = ui::write_error(err, &format!("Failed to open output file: {}", e));
            CliError::Io(e)
        })?),
        None => None,
    };

    let break_after = std::env::var("NEKOMEMO_SIM_BREAK_AFTER")
        .ok()
        .and_then(|v| v.parse::<u32>().ok());

    let mode = if opts.time_attack {
        "time-attack".to_string()
    } else {
        format!(
            "level {} ({} {} {})",
            level.global_id,
            level.difficulty.name(),
            level.range.name(),
            level.local_id
        )
    };
    writeln!(
        out,
        "Simulating {} session(s) of {} with bot {} (seed {})",
        opts.sessions, mode, bot_kind, base_seed
    )?;

    let mut save = MemorySave::default();
    for _ in 0..opts.upgrades {
        save.record_time_attack_upgrade();
    }
    let mut tally = Tally::default();

    for i in 0..opts.sessions {
        let seed = base_seed.wrapping_add(i as u64);
        let options = SessionOptions {
            seed: Some(seed),
            tuning: cfg.tuning.clone(),
            ..SessionOptions::default()
        };
        let mut session = if opts.time_attack {
            SessionController::time_attack(save, NullNotifier, options)?
        } else {
            SessionController::new(level.clone(), save, NullNotifier, options)?
        };
        let Some(mut bot) = create_player(&bot_kind, seed) else {
            return Err(CliError::InvalidInput(format!("unknown bot: {}", bot_kind)));
        };
        let report = play_session(&mut session, bot.as_mut(), SIM_DT, SIM_MAX_TICKS);

        let state = session.state();
        let line = match state.outcome.as_ref() {
            Some(SessionOutcome::Won { stars, total, .. }) => {
                tally.won += 1;
                tally.stars += *stars as u32;
                tally.nekoins += *total as u64;
                format!("won {} +{}", ui::star_bar(*stars), total)
            }
            Some(SessionOutcome::Lost {
                pairs_found,
                pairs_required,
            }) => {
                tally.lost += 1;
                format!("lost {}/{} pairs", pairs_found, pairs_required)
            }
            Some(SessionOutcome::TimeAttack {
                grids_completed,
                reward,
                ..
            }) => {
                tally.grids += *grids_completed;
                tally.nekoins += *reward as u64;
                format!("{} grid(s) +{}", grids_completed, reward)
            }
            None => {
                tally.unfinished += 1;
                ui::display_warning(
                    err,
                    &format!("session {} did not finish within the tick budget", i + 1),
                )?;
                "unfinished".to_string()
            }
        };
        writeln!(
            out,
            "Session {:>3}: {} in {} moves, {:.1}s left",
            i + 1,
            line,
            state.move_count,
            state.time_remaining
        )?;

        if let Some(logger) = logger.as_mut() {
            let mut record = SessionRecord::from_state(logger.next_id(), Some(seed), state);
            record.meta = Some(serde_json::json!({
                "bot": bot_kind,
                "ticks": report.ticks,
                "finished": report.finished,
            }));
            logger.write(&record)?;
        }

        let (returned, _) = session.exit();
        save = returned;

        if break_after == Some(i + 1) && i + 1 < opts.sessions {
            writeln!(out, "Interrupted: saved {}/{}", i + 1, opts.sessions)?;
            return Err(CliError::Interrupted(format!(
                "stopped after {} of {} sessions",
                i + 1,
                opts.sessions
            )));
        }
    }

    writeln!(
        out,
        "Summary: won {}  lost {}  unfinished {}",
        tally.won, tally.lost, tally.unfinished
    )?;
    if tally.won > 0 {
        writeln!(
            out,
            "Average stars: {:.2}",
            tally.stars as f64 / tally.won as f64
        )?;
    }
    if opts.time_attack {
        writeln!(out, "Grids cleared: {}", tally.grids)?;
    }
    writeln!(out, "Nekoins earned: {}", tally.nekoins)?;
    tracing::info!(
        sessions = opts.sessions,
        won = tally.won,
        lost = tally.lost,
        nekoins = tally.nekoins,
        "simulation finished"
    );
    Ok(())
}
