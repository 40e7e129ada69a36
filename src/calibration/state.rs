// Baseline - threshold storage for repetition detection
//
// The threshold sits a fixed fraction of the way from resting hip height to
// resting ankle height (0.9 by default, i.e. 10% of the hip-ankle distance
// above the ankles). It is computed once and never changes afterward.

use serde::{Deserialize, Serialize};

use crate::calibration::procedure::CalibrationSample;
use crate::error::CalibrationError;

/// Default fraction of the hip-to-ankle distance used for the threshold
pub const DEFAULT_THRESHOLD_RATIO: f64 = 0.9;

/// Vertical screen-fraction position used to detect repetitions.
///
/// Invariant: `0.0 <= threshold_y <= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    threshold_y: f64,
}

impl Baseline {
    /// Create a baseline from an explicit threshold
    ///
    /// # Errors
    /// `ThresholdOutOfRange` unless `threshold_y` is a finite value in `[0, 1]`.
    pub fn new(threshold_y: f64) -> Result<Self, CalibrationError> {
        if !threshold_y.is_finite() || !(0.0..=1.0).contains(&threshold_y) {
            return Err(CalibrationError::ThresholdOutOfRange { threshold_y });
        }
        Ok(Self { threshold_y })
    }

    /// Compute the baseline from warm-up samples
    ///
    /// ```text
    /// avg_hip     = mean(hip_y)
    /// avg_ankle   = mean(ankle_y)
    /// threshold_y = avg_hip + ratio * (avg_ankle - avg_hip)
    /// ```
    ///
    /// Pose estimators occasionally report coordinates slightly outside the
    /// frame; the result is clamped into `[0, 1]`.
    pub fn from_samples(
        samples: &[CalibrationSample],
        threshold_ratio: f64,
    ) -> Result<Self, CalibrationError> {
        if samples.is_empty() {
            return Err(CalibrationError::InsufficientSamples {
                required: 1,
                collected: 0,
            });
        }
        if !(0.0..=1.0).contains(&threshold_ratio) {
            return Err(CalibrationError::InvalidRatio {
                ratio: threshold_ratio,
            });
        }

        let count = samples.len() as f64;
        let avg_hip = samples.iter().map(|s| s.hip_y).sum::<f64>() / count;
        let avg_ankle = samples.iter().map(|s| s.ankle_y).sum::<f64>() / count;
        let baseline_distance = avg_ankle - avg_hip;
        let raw = avg_hip + threshold_ratio * baseline_distance;

        tracing::debug!(
            "[Baseline] avg_hip={:.4} avg_ankle={:.4} distance={:.4}",
            avg_hip,
            avg_ankle,
            baseline_distance
        );

        let threshold_y = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };
        if threshold_y != raw {
            tracing::warn!(
                "[Baseline] Threshold {} outside normalized range, clamped to {}",
                raw,
                threshold_y
            );
        }

        Ok(Self { threshold_y })
    }

    pub fn threshold_y(&self) -> f64 {
        self.threshold_y
    }
}
