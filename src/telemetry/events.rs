//! Telemetry event types describing session progress for CLI output and
//! live subscribers (renderers, overlays).

use serde::{Deserialize, Serialize};

/// Session lifecycle stages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LifecyclePhase {
    SessionStarted,
    SessionEnded,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MetricEvent {
    CalibrationProgress {
        samples_collected: usize,
        samples_needed: usize,
    },
    CalibrationComplete {
        threshold_y: f64,
    },
    Repetition {
        repetition_number: u32,
        cumulative_time: f64,
        interval: f64,
        rpm: f64,
    },
    SessionLifecycle {
        phase: LifecyclePhase,
        timestamp_ms: u64,
    },
    FrameSkipped {
        timestamp: f64,
    },
    Error {
        code: i32,
        context: String,
    },
}
