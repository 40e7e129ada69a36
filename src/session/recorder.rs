// SessionRecorder - ordered repetition log with rolling cadence
//
// Lifecycle: Idle -> Active (start_session) -> Finalized (end_session).
// Starting again after end_session replaces the finalized log with a fresh
// session (new id, empty log, empty cadence window).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::analysis::{CadenceWindow, RepetitionEvent};
use crate::config::AppConfig;
use crate::error::{log_session_error, SessionError};
use crate::session::export::export_csv;
use crate::session::summary::{format_elapsed, SessionSummary};
use crate::session::SessionId;

/// One logged repetition. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepetitionRecord {
    /// Wall-clock time the repetition was logged
    pub timestamp: DateTime<Local>,
    pub repetition_number: u32,
    /// Seconds since the previous repetition (0.0 for the first)
    pub interval: f64,
    /// Seconds since the session origin
    pub cumulative_time: f64,
    /// Rolling repetitions per minute at the time of this repetition
    pub rpm: f64,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Idle,
    Active {
        started_at: DateTime<Local>,
    },
    Finalized {
        started_at: DateTime<Local>,
        ended_at: DateTime<Local>,
        duration: f64,
    },
}

/// Records repetitions for one session and exports the finalized log
pub struct SessionRecorder {
    session_id: SessionId,
    state: SessionState,
    records: Vec<RepetitionRecord>,
    cadence: CadenceWindow,
    export_dir: Option<PathBuf>,
}

impl SessionRecorder {
    /// Create an idle recorder with a freshly generated session id
    pub fn new() -> Self {
        Self::with_session_id(SessionId::generate())
    }

    pub fn with_session_id(session_id: SessionId) -> Self {
        Self {
            session_id,
            state: SessionState::Idle,
            records: Vec::new(),
            cadence: CadenceWindow::default(),
            export_dir: None,
        }
    }

    /// Create from application config (cadence window and export location)
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new().with_config(config)
    }

    /// Apply cadence window and export settings to an existing recorder
    pub fn with_config(self, config: &AppConfig) -> Self {
        let recorder = self.with_cadence_window(config.cadence.window_size);
        if config.export.enabled {
            recorder.with_export_dir(&config.export.log_dir)
        } else {
            recorder
        }
    }

    pub fn with_cadence_window(mut self, size: usize) -> Self {
        self.cadence = CadenceWindow::new(size);
        self
    }

    /// Export the CSV log into `dir` when the session ends
    pub fn with_export_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.export_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Start the session
    ///
    /// After `end_session` this begins a new session: a fresh id, an empty
    /// log and an empty cadence window of the same size. The finalized log
    /// is dropped, never modified.
    ///
    /// # Errors
    /// `AlreadyStarted` if a session is active
    pub fn start_session(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Idle => {}
            SessionState::Active { .. } => return Err(SessionError::AlreadyStarted),
            SessionState::Finalized { .. } => {
                self.session_id = SessionId::generate();
                self.records = Vec::new();
                self.cadence = CadenceWindow::new(self.cadence.size());
            }
        }

        let started_at = Local::now();
        tracing::info!(
            "[SessionRecorder] Session {} started at {}",
            self.session_id,
            started_at.format("%Y-%m-%d %H:%M:%S")
        );
        self.state = SessionState::Active { started_at };
        Ok(())
    }

    /// Append a repetition to the log
    ///
    /// `interval` is the gap to the previous record (0.0 for the first) and
    /// `rpm` the rolling cadence over the trailing window including this one.
    ///
    /// # Errors
    /// - `NotStarted` / `Finalized` outside an active session
    /// - `OutOfOrder` unless `sequence_number` is exactly one past the last
    /// - `InvalidTime` for negative, non-finite or decreasing times
    pub fn log_repetition(
        &mut self,
        sequence_number: u32,
        cumulative_time: f64,
    ) -> Result<&RepetitionRecord, SessionError> {
        self.ensure_active()?;

        let expected = self.records.len() as u32 + 1;
        if sequence_number != expected {
            return Err(SessionError::OutOfOrder {
                expected,
                got: sequence_number,
            });
        }

        let previous_time = self.records.last().map(|r| r.cumulative_time);
        if !cumulative_time.is_finite()
            || cumulative_time < 0.0
            || previous_time.is_some_and(|prev| cumulative_time < prev)
        {
            return Err(SessionError::InvalidTime {
                value: cumulative_time,
            });
        }

        let interval = previous_time.map_or(0.0, |prev| cumulative_time - prev);
        let rpm = self.cadence.observe(cumulative_time);

        tracing::info!(
            "[{}] Repetition #{:3} | Interval: {:.2}s | RPM: {:5.1}",
            format_elapsed(cumulative_time),
            sequence_number,
            interval,
            rpm
        );

        self.records.push(RepetitionRecord {
            timestamp: Local::now(),
            repetition_number: sequence_number,
            interval,
            cumulative_time,
            rpm,
        });

        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Log a detector event
    pub fn log_event(&mut self, event: &RepetitionEvent) -> Result<&RepetitionRecord, SessionError> {
        self.log_repetition(event.sequence_number, event.cumulative_time)
    }

    /// End the session, fix its duration and export the log
    ///
    /// The session is finalized before the export runs, so an export failure
    /// still leaves a read-only log that can be summarized or re-exported.
    ///
    /// # Returns
    /// Path of the exported CSV, or `None` when no export directory is set.
    ///
    /// # Errors
    /// - `NotStarted` / `Finalized` outside an active session
    /// - `InvalidTime` for a negative or non-finite duration
    /// - `ExportFailed` if writing the CSV fails
    pub fn end_session(&mut self, duration: f64) -> Result<Option<PathBuf>, SessionError> {
        let started_at = match self.state {
            SessionState::Active { started_at } => started_at,
            SessionState::Idle => return Err(SessionError::NotStarted),
            SessionState::Finalized { .. } => return Err(SessionError::Finalized),
        };
        if !duration.is_finite() || duration < 0.0 {
            return Err(SessionError::InvalidTime { value: duration });
        }

        self.state = SessionState::Finalized {
            started_at,
            ended_at: Local::now(),
            duration,
        };
        tracing::info!(
            "[SessionRecorder] Session {} ended: {} repetitions in {}",
            self.session_id,
            self.records.len(),
            format_elapsed(duration)
        );

        match self.export_dir.clone() {
            Some(dir) => self.export_to(&dir).map(Some),
            None => Ok(None),
        }
    }

    /// Write the log as CSV into `dir` (read-only with respect to the session)
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf, SessionError> {
        export_csv(dir, &self.session_id, &self.records)
            .map(|path| {
                tracing::info!("[SessionRecorder] CSV saved: {}", path.display());
                path
            })
            .map_err(|err| {
                let err = SessionError::ExportFailed {
                    path: dir.display().to_string(),
                    reason: err.to_string(),
                };
                log_session_error(&err, "export_to");
                err
            })
    }

    /// Read-only aggregation over the log
    pub fn summary(&self) -> SessionSummary {
        let (started_at, ended_at, duration) = match &self.state {
            SessionState::Idle => (None, None, 0.0),
            SessionState::Active { started_at } => (Some(*started_at), None, 0.0),
            SessionState::Finalized {
                started_at,
                ended_at,
                duration,
            } => (Some(*started_at), Some(*ended_at), *duration),
        };
        SessionSummary::from_records(
            self.session_id.as_str(),
            started_at,
            ended_at,
            duration,
            &self.records,
        )
    }

    pub fn records(&self) -> &[RepetitionRecord] {
        &self.records
    }

    pub fn last_record(&self) -> Option<&RepetitionRecord> {
        self.records.last()
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Rolling cadence of the most recent repetition
    pub fn current_rpm(&self) -> f64 {
        self.records.last().map_or(0.0, |r| r.rpm)
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, SessionState::Finalized { .. })
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Active { .. } => Ok(()),
            SessionState::Idle => Err(SessionError::NotStarted),
            SessionState::Finalized { .. } => Err(SessionError::Finalized),
        }
    }
}

impl Default for SessionRecorder {
    fn default() -> Self {
        Self::new()
    }
}
