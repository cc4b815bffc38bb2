//! # nekomemo-engine: Pair-Matching Session Engine
//!
//! Turns a level id into a playable board, runs the flip/match/shuffle/timer
//! state machine of one play session, and computes what the session earns.
//! Rendering, input devices, audio, and persistence stay with the host; the
//! engine takes intents in and hands events out.
//!
//! ## Core Modules
//!
//! - [`level`] - Level id to difficulty, range, clock, and grid count
//! - [`economy`] - Escalating prices for powers, gacha pulls, and upgrades
//! - [`shop`] - Purchase protocol over a [`save::SaveStore`]
//! - [`board`] - Shuffled pair layout inside a bounding box
//! - [`card`] - Per-card flip lifecycle
//! - [`session`] - The session state machine (levels and time-attack)
//! - [`reward`] - Stars and currency reward of a finished session
//! - [`events`] - Phases and events emitted to the host
//! - [`save`] / [`notify`] - Collaborator contracts injected into a session
//! - [`tuning`] - Timing knobs
//! - [`logger`] - JSONL session outcome records
//! - [`errors`] - Error types for configuration and board generation
//!
//! ## Quick Start
//!
//! ```rust
//! use nekomemo_engine::level::configure;
//! use nekomemo_engine::notify::NullNotifier;
//! use nekomemo_engine::save::MemorySave;
//! use nekomemo_engine::session::{SessionController, SessionOptions};
//!
//! let level = configure(17).expect("valid level id");
//! let mut session = SessionController::new(
//!     level,
//!     MemorySave::default(),
//!     NullNotifier,
//!     SessionOptions { seed: Some(42), ..SessionOptions::default() },
//! )
//! .expect("board builds");
//!
//! // host loop: feed touches, then advance one frame
//! let (x, y) = session.cards()[0].rect().center();
//! session.touch_card(x, y);
//! session.tick(1.0 / 60.0);
//! for event in session.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```
//!
//! ## Deterministic Boards
//!
//! Boards, reshuffles, and time-attack card picks come from one seeded
//! ChaCha20 stream, so the same seed and the same inputs replay identically.

pub mod board;
pub mod card;
pub mod economy;
pub mod errors;
pub mod events;
pub mod level;
pub mod logger;
pub mod notify;
pub mod reward;
pub mod save;
pub mod session;
pub mod shop;
pub mod tuning;
