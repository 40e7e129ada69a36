//! READY/UP threshold-crossing detector turning ankle heights into repetitions.

use serde::{Deserialize, Serialize};

use crate::calibration::Baseline;
use crate::pose::{Landmark, LandmarkFrame};

/// Detector state. `Ready` is initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorState {
    /// Feet at or below the threshold, waiting for lift-off
    Ready,
    /// Feet lifted above the threshold
    Up,
}

impl DetectorState {
    pub fn label(&self) -> &'static str {
        match self {
            DetectorState::Ready => "ready",
            DetectorState::Up => "up",
        }
    }
}

/// A completed repetition: feet went up through the threshold and came back down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepetitionEvent {
    /// 1-based, gapless, strictly increasing
    pub sequence_number: u32,
    /// Seconds since the session origin
    pub cumulative_time: f64,
}

/// Hysteresis state machine over the averaged ankle height.
///
/// Screen `y` grows downward, so "up" means `ankle_y < threshold_y`.
///
/// | state | condition               | next  | event |
/// |-------|-------------------------|-------|-------|
/// | Ready | ankle_y < threshold_y   | Up    | no    |
/// | Up    | ankle_y > threshold_y   | Ready | yes   |
/// | any   | otherwise               | same  | no    |
///
/// Only the opposite direction is guarded, so noise oscillating around the
/// threshold can produce an Up immediately after a Ready. No debounce is applied.
#[derive(Debug, Clone, Default)]
pub struct RepetitionDetector {
    stage: Option<DetectorState>,
    count: u32,
}

impl RepetitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one landmark frame against the calibrated baseline
    ///
    /// The baseline argument makes "calibration complete" a precondition the
    /// caller cannot skip. Frames missing a hip or ankle are ignored.
    ///
    /// # Returns
    /// `Some(event)` when this frame completes a repetition.
    pub fn update(
        &mut self,
        frame: &LandmarkFrame,
        baseline: &Baseline,
        cumulative_time: f64,
    ) -> Option<RepetitionEvent> {
        let ankle_y = frame.lower_body()?.ankle_y();
        self.update_ankle_y(ankle_y, baseline.threshold_y(), cumulative_time)
    }

    /// Core transition on an already averaged ankle height
    pub fn update_ankle_y(
        &mut self,
        ankle_y: f64,
        threshold_y: f64,
        cumulative_time: f64,
    ) -> Option<RepetitionEvent> {
        match self.state() {
            DetectorState::Ready if ankle_y < threshold_y => {
                self.stage = Some(DetectorState::Up);
                tracing::trace!(
                    "[RepetitionDetector] Up: ankle_y={:.3} threshold={:.3}",
                    ankle_y,
                    threshold_y
                );
                None
            }
            DetectorState::Up if ankle_y > threshold_y => {
                self.stage = Some(DetectorState::Ready);
                self.count += 1;
                tracing::debug!(
                    "[RepetitionDetector] Repetition #{} at {:.3}s",
                    self.count,
                    cumulative_time
                );
                Some(RepetitionEvent {
                    sequence_number: self.count,
                    cumulative_time,
                })
            }
            _ => None,
        }
    }

    /// Averaged ankle coordinate for the on-screen marker; no state change
    pub fn marker_position(&self, frame: &LandmarkFrame) -> Option<Landmark> {
        frame.lower_body().map(|body| body.ankle_position())
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// `None` until the first lift-off
    pub fn stage(&self) -> Option<DetectorState> {
        self.stage
    }

    pub fn state(&self) -> DetectorState {
        self.stage.unwrap_or(DetectorState::Ready)
    }

    pub fn stage_label(&self) -> &'static str {
        self.state().label()
    }
}
