//! Session summary statistics.
//!
//! Every aggregate over an empty collection is `0.0`, so a summary can always
//! be produced, including for sessions without a single repetition.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::session::recorder::RepetitionRecord;

/// Aggregated statistics for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: Option<DateTime<Local>>,
    pub ended_at: Option<DateTime<Local>>,
    /// Seconds, fixed at session end (0.0 before)
    pub duration: f64,
    pub total_repetitions: usize,
    pub average_rpm: f64,
    pub max_rpm: f64,
    /// Minimum over strictly positive RPM values only
    pub min_rpm: f64,
    /// Interval statistics exclude the first record, whose interval is always 0
    pub average_interval: f64,
    pub max_interval: f64,
    pub min_interval: f64,
}

impl SessionSummary {
    pub fn from_records(
        session_id: &str,
        started_at: Option<DateTime<Local>>,
        ended_at: Option<DateTime<Local>>,
        duration: f64,
        records: &[RepetitionRecord],
    ) -> Self {
        let rpms: Vec<f64> = records.iter().map(|r| r.rpm).collect();
        let positive_rpms: Vec<f64> = rpms.iter().copied().filter(|rpm| *rpm > 0.0).collect();
        let intervals: Vec<f64> = records.iter().skip(1).map(|r| r.interval).collect();

        Self {
            session_id: session_id.to_string(),
            started_at,
            ended_at,
            duration,
            total_repetitions: records.len(),
            average_rpm: mean(&rpms),
            max_rpm: max_or_zero(&rpms),
            min_rpm: min_or_zero(&positive_rpms),
            average_interval: mean(&intervals),
            max_interval: max_or_zero(&intervals),
            min_interval: min_or_zero(&intervals),
        }
    }

    /// Human-readable end-of-session report
    pub fn render_table(&self) -> String {
        if self.total_repetitions == 0 {
            return "No repetitions recorded.".to_string();
        }

        let minutes = (self.duration / 60.0).floor() as u64;
        let seconds = (self.duration % 60.0).floor() as u64;
        let rule = "=".repeat(50);
        [
            rule.clone(),
            "Session complete!".to_string(),
            rule.clone(),
            format!("Total repetitions : {}", self.total_repetitions),
            format!("Duration          : {}m {}s", minutes, seconds),
            format!("Average RPM       : {:.1}", self.average_rpm),
            format!("Max RPM           : {:.1}", self.max_rpm),
            format!("Average interval  : {:.2}s", self.average_interval),
            rule,
        ]
        .join("\n")
    }
}

/// Format seconds as `mm:ss`
pub fn format_elapsed(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    format!(
        "{:02}:{:02}",
        (seconds / 60.0).floor() as u64,
        (seconds % 60.0).floor() as u64
    )
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn max_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

fn min_or_zero(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::min).unwrap_or(0.0)
}
