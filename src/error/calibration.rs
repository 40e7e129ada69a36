// Calibration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Calibration error code constants
///
/// Error code range: 2001-2005
pub struct CalibrationErrorCodes;

impl CalibrationErrorCodes {
    /// Warm-up window must contain at least one frame
    pub const INVALID_FRAME_COUNT: i32 = 2001;

    /// Threshold ratio outside [0.0, 1.0]
    pub const INVALID_RATIO: i32 = 2002;

    /// Calibration not complete
    pub const NOT_COMPLETE: i32 = 2003;

    /// Explicit threshold outside the normalized screen range
    pub const THRESHOLD_OUT_OF_RANGE: i32 = 2004;

    /// Baseline requested from an empty sample set
    pub const INSUFFICIENT_SAMPLES: i32 = 2005;
}

/// Log a calibration error with structured context
///
/// Emits the numeric code, the failing component and the human-readable
/// message on a single line.
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=Calibrator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// These errors cover calibrator construction and the "baseline required"
/// precondition of the repetition detector.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// `num_frames` must be at least 1
    InvalidFrameCount { num_frames: usize },

    /// Threshold ratio must lie within [0.0, 1.0]
    InvalidRatio { ratio: f64 },

    /// Calibration not complete, baseline unavailable
    NotComplete,

    /// Threshold must lie within [0.0, 1.0]
    ThresholdOutOfRange { threshold_y: f64 },

    /// Not enough calibration samples to compute a baseline
    InsufficientSamples { required: usize, collected: usize },
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::InvalidFrameCount { .. } => {
                CalibrationErrorCodes::INVALID_FRAME_COUNT
            }
            CalibrationError::InvalidRatio { .. } => CalibrationErrorCodes::INVALID_RATIO,
            CalibrationError::NotComplete => CalibrationErrorCodes::NOT_COMPLETE,
            CalibrationError::ThresholdOutOfRange { .. } => {
                CalibrationErrorCodes::THRESHOLD_OUT_OF_RANGE
            }
            CalibrationError::InsufficientSamples { .. } => {
                CalibrationErrorCodes::INSUFFICIENT_SAMPLES
            }
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::InvalidFrameCount { num_frames } => {
                format!("Calibration needs at least 1 frame (got {})", num_frames)
            }
            CalibrationError::InvalidRatio { ratio } => {
                format!("Threshold ratio must be within [0, 1] (got {})", ratio)
            }
            CalibrationError::NotComplete => "Calibration not complete".to_string(),
            CalibrationError::ThresholdOutOfRange { threshold_y } => {
                format!("Threshold y must be within [0, 1] (got {})", threshold_y)
            }
            CalibrationError::InsufficientSamples {
                required,
                collected,
            } => {
                format!("Insufficient samples: need {}, got {}", required, collected)
            }
        }
    }

    fn is_precondition_violation(&self) -> bool {
        matches!(self, CalibrationError::NotComplete)
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_error_codes() {
        assert_eq!(
            CalibrationError::InvalidFrameCount { num_frames: 0 }.code(),
            CalibrationErrorCodes::INVALID_FRAME_COUNT
        );
        assert_eq!(
            CalibrationError::InvalidRatio { ratio: 1.5 }.code(),
            CalibrationErrorCodes::INVALID_RATIO
        );
        assert_eq!(
            CalibrationError::NotComplete.code(),
            CalibrationErrorCodes::NOT_COMPLETE
        );
        assert_eq!(
            CalibrationError::ThresholdOutOfRange { threshold_y: -0.1 }.code(),
            CalibrationErrorCodes::THRESHOLD_OUT_OF_RANGE
        );
        assert_eq!(
            CalibrationError::InsufficientSamples {
                required: 1,
                collected: 0
            }
            .code(),
            CalibrationErrorCodes::INSUFFICIENT_SAMPLES
        );
    }

    #[test]
    fn test_calibration_error_messages() {
        let err = CalibrationError::InvalidFrameCount { num_frames: 0 };
        assert_eq!(err.message(), "Calibration needs at least 1 frame (got 0)");

        let err = CalibrationError::NotComplete;
        assert!(err.message().contains("not complete"));

        let err = CalibrationError::InvalidRatio { ratio: 2.0 };
        assert!(err.message().contains("got 2"));
    }

    #[test]
    fn test_calibration_error_display() {
        let err = CalibrationError::NotComplete;
        let display = format!("{}", err);
        assert!(display.contains("CalibrationError"));
        assert!(display.contains(&err.code().to_string()));
    }

    #[test]
    fn test_only_not_complete_is_precondition() {
        assert!(CalibrationError::NotComplete.is_precondition_violation());
        assert!(!CalibrationError::InvalidFrameCount { num_frames: 0 }.is_precondition_violation());
    }
}
