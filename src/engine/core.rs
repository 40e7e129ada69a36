//! JumpEngine: frame-driven counting driver.
//!
//! Owns one calibrator, one detector, one session recorder and one telemetry
//! collector for the lifetime of a session. Frames are processed strictly in
//! the order they are handed in; nothing runs in the background.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::analysis::RepetitionDetector;
use crate::calibration::{Baseline, CalibrationProgress, Calibrator};
use crate::config::AppConfig;
use crate::engine::snapshot::{BaselineStatus, FrameSnapshot};
use crate::error::{
    log_calibration_error, log_session_error, CalibrationError, ErrorCode, SessionError,
};
use crate::pose::{FrameInput, Landmark, LandmarkFrame, LandmarkSource};
use crate::session::{RepetitionRecord, SessionRecorder, SessionSummary};
use crate::telemetry::{LifecyclePhase, MetricEvent, TelemetryCollector, TelemetrySnapshot};

/// What a single frame did to the engine
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// No detection, missing joints or out-of-order timestamp
    Skipped,
    /// Warm-up sample accepted
    Calibrating(CalibrationProgress),
    /// This frame completed calibration; the session has started
    Calibrated(Baseline),
    /// Counting, no repetition completed on this frame
    Tracking,
    /// A repetition completed and was logged
    Repetition(RepetitionRecord),
}

/// Frame counters for reporting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameStats {
    pub processed: u64,
    pub skipped: u64,
}

/// Outcome of [`JumpEngine::finish`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub export_path: Option<PathBuf>,
    pub frames: FrameStats,
}

/// JumpEngine orchestrates calibration, detection and recording
pub struct JumpEngine {
    calibrator: Calibrator,
    detector: RepetitionDetector,
    recorder: SessionRecorder,
    telemetry: TelemetryCollector,
    origin: Option<f64>,
    last_timestamp: Option<f64>,
    marker: Option<Landmark>,
    stats: FrameStats,
}

impl JumpEngine {
    /// Create an engine from application config with a fresh session recorder
    pub fn new(config: &AppConfig) -> Result<Self, CalibrationError> {
        Self::with_recorder(config, SessionRecorder::from_config(config))
    }

    /// Create an engine around a caller-built recorder (custom id or export location)
    pub fn with_recorder(
        config: &AppConfig,
        recorder: SessionRecorder,
    ) -> Result<Self, CalibrationError> {
        let calibrator = Calibrator::from_config(&config.calibration).inspect_err(|err| {
            log_calibration_error(err, "JumpEngine::with_recorder");
        })?;
        Ok(Self {
            calibrator,
            detector: RepetitionDetector::new(),
            recorder,
            telemetry: TelemetryCollector::from_config(&config.telemetry),
            origin: None,
            last_timestamp: None,
            marker: None,
            stats: FrameStats::default(),
        })
    }

    /// Process one frame of the landmark stream
    ///
    /// # Errors
    /// `Finalized` once [`JumpEngine::finish`] has run; the frame is not
    /// looked at. Other recorder failures indicate a broken invariant between
    /// detector and recorder and are returned immediately.
    pub fn process(&mut self, input: &FrameInput) -> Result<FrameOutcome, SessionError> {
        if self.recorder.is_finalized() {
            return Err(SessionError::Finalized);
        }
        let Some(frame) = input.landmarks.as_ref() else {
            return Ok(self.skip(input.timestamp));
        };
        if frame.lower_body().is_none() {
            return Ok(self.skip(input.timestamp));
        }
        if !input.timestamp.is_finite()
            || self.last_timestamp.is_some_and(|last| input.timestamp < last)
        {
            tracing::warn!(
                "[JumpEngine] Dropping frame with out-of-order timestamp {}",
                input.timestamp
            );
            return Ok(self.skip(input.timestamp));
        }

        self.stats.processed += 1;
        self.last_timestamp = Some(input.timestamp);
        self.marker = self.detector.marker_position(frame);

        let Some(baseline) = self.calibrator.baseline() else {
            return self.calibrate(frame, input.timestamp);
        };

        let origin = self.origin.unwrap_or(input.timestamp);
        let cumulative_time = (input.timestamp - origin).max(0.0);
        let Some(event) = self.detector.update(frame, &baseline, cumulative_time) else {
            return Ok(FrameOutcome::Tracking);
        };

        let record = match self.recorder.log_event(&event) {
            Ok(record) => record.clone(),
            Err(err) => {
                log_session_error(&err, "process");
                self.telemetry.record_error(err.code(), "log_repetition");
                return Err(err);
            }
        };
        self.telemetry.publish(MetricEvent::Repetition {
            repetition_number: record.repetition_number,
            cumulative_time: record.cumulative_time,
            interval: record.interval,
            rpm: record.rpm,
        });
        Ok(FrameOutcome::Repetition(record))
    }

    /// Drain a landmark source, returning the number of frames consumed
    pub fn run<S: LandmarkSource + ?Sized>(&mut self, source: &mut S) -> Result<u64, SessionError> {
        let mut frames = 0;
        while let Some(input) = source.next_frame() {
            self.process(&input)?;
            frames += 1;
        }
        Ok(frames)
    }

    /// End the session and export its log
    ///
    /// Duration is the time between the session origin (calibration
    /// completion) and the last processed frame.
    ///
    /// # Errors
    /// `NotStarted` if calibration never completed, plus any recorder error.
    pub fn finish(&mut self) -> Result<SessionReport, SessionError> {
        let duration = match (self.origin, self.last_timestamp) {
            (Some(origin), Some(last)) => (last - origin).max(0.0),
            (Some(_), None) => 0.0,
            (None, _) => return Err(SessionError::NotStarted),
        };

        let export_path = self.recorder.end_session(duration).inspect_err(|err| {
            self.telemetry.record_error(err.code(), "end_session");
        })?;
        self.telemetry.record_lifecycle(LifecyclePhase::SessionEnded);

        Ok(SessionReport {
            summary: self.recorder.summary(),
            export_path,
            frames: self.stats,
        })
    }

    /// Read-only renderer view of the current state
    pub fn snapshot(&self) -> FrameSnapshot {
        let baseline = match self.calibrator.baseline() {
            Some(baseline) => BaselineStatus::Ready {
                threshold_y: baseline.threshold_y(),
            },
            None => BaselineStatus::Pending {
                progress: self.calibrator.progress_report(),
            },
        };
        let elapsed = match (self.origin, self.last_timestamp) {
            (Some(origin), Some(last)) => (last - origin).max(0.0),
            _ => 0.0,
        };

        FrameSnapshot {
            baseline,
            count: self.detector.count(),
            stage: self.detector.stage(),
            stage_label: self.detector.stage_label().to_string(),
            marker: self.marker,
            rpm: self.recorder.current_rpm(),
            elapsed,
        }
    }

    /// Baseline, or `NotComplete` while calibrating
    pub fn require_baseline(&self) -> Result<Baseline, CalibrationError> {
        self.calibrator.require_baseline()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.telemetry.subscribe()
    }

    pub fn telemetry_snapshot(&self) -> TelemetrySnapshot {
        self.telemetry.snapshot()
    }

    pub fn calibrator(&self) -> &Calibrator {
        &self.calibrator
    }

    pub fn detector(&self) -> &RepetitionDetector {
        &self.detector
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.stats
    }

    fn calibrate(
        &mut self,
        frame: &LandmarkFrame,
        timestamp: f64,
    ) -> Result<FrameOutcome, SessionError> {
        match self.calibrator.add_frame(frame) {
            Some(baseline) => {
                self.telemetry.publish(MetricEvent::CalibrationComplete {
                    threshold_y: baseline.threshold_y(),
                });
                self.recorder.start_session().inspect_err(|err| {
                    log_session_error(err, "calibrate");
                })?;
                self.origin = Some(timestamp);
                self.telemetry.record_lifecycle(LifecyclePhase::SessionStarted);
                Ok(FrameOutcome::Calibrated(baseline))
            }
            None => {
                let progress = self.calibrator.progress_report();
                self.telemetry.publish(MetricEvent::CalibrationProgress {
                    samples_collected: progress.samples_collected,
                    samples_needed: progress.samples_needed,
                });
                Ok(FrameOutcome::Calibrating(progress))
            }
        }
    }

    fn skip(&mut self, timestamp: f64) -> FrameOutcome {
        self.stats.skipped += 1;
        self.telemetry.publish(MetricEvent::FrameSkipped { timestamp });
        FrameOutcome::Skipped
    }
}
