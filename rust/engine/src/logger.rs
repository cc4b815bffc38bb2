use serde::{Deserialize, Serialize};

use crate::session::{SessionMode, SessionOutcome, SessionState};

/// Outcome of one finished (or abandoned) session.
/// Serialized one per line to JSONL session logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Unique identifier (format: YYYYMMDD-NNNNNN)
    pub session_id: String,
    /// RNG seed the session ran with (enables deterministic replay)
    pub seed: Option<u64>,
    /// `"level"` or `"time_attack"`
    pub mode: String,
    /// Global level id for level sessions
    #[serde(default)]
    pub level_id: Option<u32>,
    /// `None` when the session was abandoned before ending
    pub outcome: Option<SessionOutcome>,
    pub moves: u32,
    pub pairs_found: u32,
    pub time_remaining: f32,
    /// Timestamp when the record was written (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    /// Additional metadata (extensible JSON object)
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl SessionRecord {
    pub fn from_state(session_id: String, seed: Option<u64>, state: &SessionState) -> Self {
        let (mode, level_id) = match &state.mode {
            SessionMode::Level(level) => ("level", Some(level.global_id)),
            SessionMode::TimeAttack { .. } => ("time_attack", None),
        };
        Self {
            session_id,
            seed,
            mode: mode.to_string(),
            level_id,
            outcome: state.outcome.clone(),
            moves: state.move_count,
            pairs_found: state.pairs_found_total,
            time_remaining: state.time_remaining,
            ts: None,
            meta: None,
        }
    }
}

pub fn format_session_id(yyyymmdd: &str, seq: u32) -> String {
    format!("{}-{:06}", yyyymmdd, seq)
}

use chrono::{SecondsFormat, Utc};
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

pub struct SessionLogger {
    writer: Option<BufWriter<File>>,
    date: String,
    seq: u32,
}

impl SessionLogger {
    pub fn create<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }
        let f = File::create(path)?;
        Ok(Self {
            writer: Some(BufWriter::new(f)),
            date: Utc::now().format("%Y%m%d").to_string(),
            seq: 0,
        })
    }

    pub fn with_seq_for_test(date: &str) -> Self {
        Self {
            writer: None,
            date: date.to_string(),
            seq: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_session_id(&self.date, self.seq)
    }

    pub fn write(&mut self, record: &SessionRecord) -> std::io::Result<()> {
        // inject timestamp if missing
        let mut rec = record.clone();
        if rec.ts.is_none() {
            rec.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        let line = serde_json::to_string(&rec).map_err(std::io::Error::other)?;
        if let Some(w) = &mut self.writer {
            w.write_all(line.as_bytes())?;
            w.write_all(b"\n")?;
            w.flush()?;
        }
        Ok(())
    }
}
