//! Read-only per-frame view for renderers.
//!
//! Drawing the threshold line, the ankle marker and the counters happens
//! outside this crate. Renderers only ever see a [`FrameSnapshot`].

use serde::{Deserialize, Serialize};

use crate::analysis::DetectorState;
use crate::calibration::CalibrationProgress;
use crate::pose::Landmark;

/// Calibration status as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BaselineStatus {
    /// Warm-up still running ("stand still" overlay)
    Pending { progress: CalibrationProgress },
    /// Threshold line available
    Ready { threshold_y: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub baseline: BaselineStatus,
    pub count: u32,
    pub stage: Option<DetectorState>,
    pub stage_label: String,
    /// Averaged ankle position of the most recent detected frame
    pub marker: Option<Landmark>,
    /// Rolling cadence of the most recent repetition
    pub rpm: f64,
    /// Seconds since the session origin (0.0 while calibrating)
    pub elapsed: f64,
}

impl FrameSnapshot {
    pub fn threshold_y(&self) -> Option<f64> {
        match self.baseline {
            BaselineStatus::Ready { threshold_y } => Some(threshold_y),
            BaselineStatus::Pending { .. } => None,
        }
    }
}

/// Implemented by on-screen or textual renderers consuming snapshots.
pub trait Renderer {
    fn render(&mut self, snapshot: &FrameSnapshot);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_accessor() {
        let mut snapshot = FrameSnapshot {
            baseline: BaselineStatus::Pending {
                progress: CalibrationProgress::new(3, 30),
            },
            count: 0,
            stage: None,
            stage_label: "ready".to_string(),
            marker: None,
            rpm: 0.0,
            elapsed: 0.0,
        };
        assert_eq!(snapshot.threshold_y(), None);

        snapshot.baseline = BaselineStatus::Ready { threshold_y: 0.86 };
        assert_eq!(snapshot.threshold_y(), Some(0.86));
    }

    #[test]
    fn test_status_json_is_tagged() {
        let status = BaselineStatus::Ready { threshold_y: 0.5 };
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["threshold_y"], 0.5);
    }
}
