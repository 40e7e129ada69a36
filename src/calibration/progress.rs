// Progress tracking for the calibration warm-up window

use serde::{Deserialize, Serialize};

/// Progress information for the calibration warm-up
///
/// Sent to renderers so they can show "stand still" feedback
/// with a `collected / needed` counter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    /// Number of samples collected so far
    pub samples_collected: usize,
    /// Total samples needed to compute the baseline
    pub samples_needed: usize,
}

impl CalibrationProgress {
    pub fn new(samples_collected: usize, samples_needed: usize) -> Self {
        Self {
            samples_collected,
            samples_needed,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.samples_collected >= self.samples_needed
    }

    /// Fraction collected, clamped to `[0, 1]`
    pub fn fraction(&self) -> f64 {
        if self.samples_needed == 0 {
            return 0.0;
        }
        (self.samples_collected as f64 / self.samples_needed as f64).clamp(0.0, 1.0)
    }

    /// Get progress percentage (0-100)
    pub fn percentage(&self) -> u8 {
        (self.fraction() * 100.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert_eq!(CalibrationProgress::new(0, 30).percentage(), 0);
        assert_eq!(CalibrationProgress::new(15, 30).percentage(), 50);
        assert_eq!(CalibrationProgress::new(30, 30).percentage(), 100);
        assert_eq!(CalibrationProgress::new(6, 30).percentage(), 20);
    }

    #[test]
    fn test_progress_zero_needed() {
        let progress = CalibrationProgress::new(0, 0);
        assert_eq!(progress.fraction(), 0.0);
        assert_eq!(progress.percentage(), 0);
    }

    #[test]
    fn test_progress_is_complete() {
        assert!(CalibrationProgress::new(30, 30).is_complete());
        assert!(!CalibrationProgress::new(29, 30).is_complete());
    }
}
