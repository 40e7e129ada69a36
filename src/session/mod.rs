//! Session recording - repetition log, cadence, summary and export
//!
//! A [`SessionRecorder`] owns one session from `start_session` to
//! `end_session`. The log is append-only while the session is active and
//! read-only once it has been finalized.

pub mod export;
pub mod recorder;
pub mod summary;

use std::fmt;

use chrono::Local;
use serde::{Deserialize, Serialize};

pub use export::{export_csv, export_file_name, write_csv, CSV_HEADER};
pub use recorder::{RepetitionRecord, SessionRecorder};
pub use summary::{format_elapsed, SessionSummary};

/// Time-based session identifier, `%Y%m%d_%H%M%S` in local time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn generate() -> Self {
        Self(Local::now().format("%Y%m%d_%H%M%S").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
