// Error types for the jump rope counter
//
// This module defines custom error types for calibration and session
// operations, providing structured error handling with numeric error codes
// suitable for CLI exit reporting and telemetry.

mod calibration;
mod session;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use session::{log_session_error, SessionError, SessionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the library and CLI boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;

    /// Whether the error is a caller precondition violation (programmer error)
    ///
    /// Precondition violations are surfaced immediately and never retried.
    fn is_precondition_violation(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_trait_objects() {
        let cal_err: &dyn ErrorCode = &CalibrationError::NotComplete;
        assert_eq!(cal_err.code(), 2003);
        assert!(cal_err.is_precondition_violation());

        let session_err: &dyn ErrorCode = &SessionError::NotStarted;
        assert_eq!(session_err.code(), 3002);
        assert!(session_err.is_precondition_violation());
    }

    #[test]
    fn test_export_failure_is_not_precondition() {
        let err = SessionError::ExportFailed {
            path: "logs/jumps.csv".to_string(),
            reason: "disk full".to_string(),
        };
        assert!(!err.is_precondition_violation());
    }
}
