// Calibrator - warm-up sample collection
//
// While the subject stands still, each detected frame contributes one
// (hip_y, ankle_y) sample. Once `num_frames` samples are in, the Baseline
// is computed, the samples are discarded and further frames are ignored.

use crate::calibration::progress::CalibrationProgress;
use crate::calibration::state::{Baseline, DEFAULT_THRESHOLD_RATIO};
use crate::config::CalibrationConfig;
use crate::error::CalibrationError;
use crate::pose::{LandmarkFrame, LowerBody};

/// Default warm-up length: ~1 second at 30 fps
pub const DEFAULT_NUM_FRAMES: usize = 30;

/// Left/right averaged hip and ankle heights for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSample {
    pub hip_y: f64,
    pub ankle_y: f64,
}

impl From<&LowerBody> for CalibrationSample {
    fn from(body: &LowerBody) -> Self {
        Self {
            hip_y: body.hip_y(),
            ankle_y: body.ankle_y(),
        }
    }
}

/// Calibrator manages the warm-up window and produces the Baseline
#[derive(Debug, Clone)]
pub struct Calibrator {
    num_frames: usize,
    threshold_ratio: f64,
    samples: Vec<CalibrationSample>,
    samples_collected: usize,
    baseline: Option<Baseline>,
}

impl Calibrator {
    /// Create a calibrator collecting `num_frames` samples
    ///
    /// # Errors
    /// `InvalidFrameCount` if `num_frames == 0`.
    pub fn new(num_frames: usize) -> Result<Self, CalibrationError> {
        Self::with_ratio(num_frames, DEFAULT_THRESHOLD_RATIO)
    }

    /// Create with a custom hip-to-ankle threshold ratio
    pub fn with_ratio(num_frames: usize, threshold_ratio: f64) -> Result<Self, CalibrationError> {
        if num_frames == 0 {
            return Err(CalibrationError::InvalidFrameCount { num_frames });
        }
        if !(0.0..=1.0).contains(&threshold_ratio) {
            return Err(CalibrationError::InvalidRatio {
                ratio: threshold_ratio,
            });
        }

        Ok(Self {
            num_frames,
            threshold_ratio,
            samples: Vec::with_capacity(num_frames),
            samples_collected: 0,
            baseline: None,
        })
    }

    pub fn from_config(config: &CalibrationConfig) -> Result<Self, CalibrationError> {
        Self::with_ratio(config.num_frames, config.threshold_ratio)
    }

    /// Create with default configuration (30 frames, ratio 0.9)
    pub fn new_default() -> Self {
        Self {
            num_frames: DEFAULT_NUM_FRAMES,
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
            samples: Vec::with_capacity(DEFAULT_NUM_FRAMES),
            samples_collected: 0,
            baseline: None,
        }
    }

    /// Add one landmark frame to the warm-up window
    ///
    /// Frames are ignored once calibration is complete, and frames missing a
    /// hip or ankle are skipped without changing state.
    ///
    /// # Returns
    /// `Some(baseline)` only for the frame that completes calibration.
    pub fn add_frame(&mut self, frame: &LandmarkFrame) -> Option<Baseline> {
        if self.is_complete() {
            return None;
        }
        let body = frame.lower_body()?;
        self.add_sample(CalibrationSample::from(&body))
    }

    /// Add a pre-computed sample (same semantics as [`Calibrator::add_frame`])
    pub fn add_sample(&mut self, sample: CalibrationSample) -> Option<Baseline> {
        if self.is_complete() {
            return None;
        }

        self.samples.push(sample);
        self.samples_collected += 1;

        if self.samples_collected < self.num_frames {
            return None;
        }

        match Baseline::from_samples(&self.samples, self.threshold_ratio) {
            Ok(baseline) => {
                tracing::info!(
                    "[Calibrator] Calibration complete: threshold_y={:.3} from {} samples",
                    baseline.threshold_y(),
                    self.samples.len()
                );
                self.samples.clear();
                self.samples.shrink_to_fit();
                self.baseline = Some(baseline);
                Some(baseline)
            }
            Err(err) => {
                // Unreachable with num_frames >= 1 and a validated ratio
                tracing::warn!("[Calibrator] Baseline computation failed: {}", err);
                None
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    /// Baseline, or `NotComplete` while the warm-up is still running
    pub fn require_baseline(&self) -> Result<Baseline, CalibrationError> {
        self.baseline.ok_or(CalibrationError::NotComplete)
    }

    /// samples_collected / num_frames, clamped to [0, 1]
    pub fn progress(&self) -> f64 {
        self.progress_report().fraction()
    }

    pub fn progress_report(&self) -> CalibrationProgress {
        CalibrationProgress::new(self.samples_collected, self.num_frames)
    }

    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    pub fn samples_collected(&self) -> usize {
        self.samples_collected
    }

    pub fn threshold_ratio(&self) -> f64 {
        self.threshold_ratio
    }
}
