// Session recorder error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Session error code constants
///
/// Error code range: 3001-3006
pub struct SessionErrorCodes;

impl SessionErrorCodes {
    /// `start_session` called while a session is active
    pub const ALREADY_STARTED: i32 = 3001;

    /// Operation requires an active session
    pub const NOT_STARTED: i32 = 3002;

    /// Session log already finalized
    pub const FINALIZED: i32 = 3003;

    /// Repetition sequence number is not the next expected one
    pub const OUT_OF_ORDER: i32 = 3004;

    /// Negative, non-finite or decreasing time value
    pub const INVALID_TIME: i32 = 3005;

    /// Writing the tabular export failed
    pub const EXPORT_FAILED: i32 = 3006;
}

/// Log a session error with structured context
pub fn log_session_error(err: &SessionError, context: &str) {
    error!(
        "Session error in {}: code={}, component=SessionRecorder, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Session-related errors
///
/// Everything except `ExportFailed` and `InvalidTime` is a caller
/// precondition violation.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Session already active
    AlreadyStarted,

    /// No active session
    NotStarted,

    /// Session already ended, log is read-only
    Finalized,

    /// Sequence numbers must be gapless and start at 1
    OutOfOrder { expected: u32, got: u32 },

    /// Time values must be finite, non-negative and non-decreasing
    InvalidTime { value: f64 },

    /// Export I/O failure
    ExportFailed { path: String, reason: String },
}

impl ErrorCode for SessionError {
    fn code(&self) -> i32 {
        match self {
            SessionError::AlreadyStarted => SessionErrorCodes::ALREADY_STARTED,
            SessionError::NotStarted => SessionErrorCodes::NOT_STARTED,
            SessionError::Finalized => SessionErrorCodes::FINALIZED,
            SessionError::OutOfOrder { .. } => SessionErrorCodes::OUT_OF_ORDER,
            SessionError::InvalidTime { .. } => SessionErrorCodes::INVALID_TIME,
            SessionError::ExportFailed { .. } => SessionErrorCodes::EXPORT_FAILED,
        }
    }

    fn message(&self) -> String {
        match self {
            SessionError::AlreadyStarted => {
                "Session already started. Call end_session() first.".to_string()
            }
            SessionError::NotStarted => {
                "Session not started. Call start_session() first.".to_string()
            }
            SessionError::Finalized => "Session already finalized".to_string(),
            SessionError::OutOfOrder { expected, got } => {
                format!(
                    "Repetition out of order: expected #{}, got #{}",
                    expected, got
                )
            }
            SessionError::InvalidTime { value } => {
                format!("Invalid session time value: {}", value)
            }
            SessionError::ExportFailed { path, reason } => {
                format!("Failed to export session to {}: {}", path, reason)
            }
        }
    }

    fn is_precondition_violation(&self) -> bool {
        matches!(
            self,
            SessionError::AlreadyStarted
                | SessionError::NotStarted
                | SessionError::Finalized
                | SessionError::OutOfOrder { .. }
        )
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SessionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for SessionError {}
