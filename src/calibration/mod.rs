// Calibration module - warm-up window and baseline threshold
//
// This module provides three components:
// 1. Calibrator: collects hip/ankle samples while the subject stands still
// 2. Baseline: the immutable vertical threshold computed from those samples
// 3. CalibrationProgress: read-only progress report for on-screen feedback
//
// The calibration workflow:
// 1. Create a Calibrator (default 30 frames, ~1 second at 30 fps)
// 2. Feed landmark frames until it reports completion
// 3. Hand the resulting Baseline to the RepetitionDetector

pub mod procedure;
pub mod progress;
pub mod state;

pub use procedure::{CalibrationSample, Calibrator};
pub use progress::CalibrationProgress;
pub use state::Baseline;
