//! Session telemetry collector.
//!
//! Each engine owns its own collector: a bounded history of recent events
//! plus a broadcast channel for read-only subscribers. Publishing never
//! blocks and never fails, whether or not anyone is listening.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::broadcast;

use crate::config::TelemetryConfig;

pub mod events;

pub use events::{LifecyclePhase, MetricEvent};

/// Snapshot of collector state for CLI reporting.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySnapshot {
    pub recent: Vec<MetricEvent>,
    pub total_events: u64,
    pub dropped_events: u64,
}

/// Broadcast-based collector retaining a bounded history of metrics.
pub struct TelemetryCollector {
    tx: broadcast::Sender<MetricEvent>,
    history: VecDeque<MetricEvent>,
    history_capacity: usize,
    total_events: u64,
    dropped_history: u64,
}

impl TelemetryCollector {
    pub fn new(buffer: usize, history_capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(buffer.max(1));
        Self {
            tx,
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
            total_events: 0,
            dropped_history: 0,
        }
    }

    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::new(config.channel_capacity, config.history_capacity)
    }

    pub fn publish(&mut self, event: MetricEvent) {
        self.total_events += 1;
        if self.history_capacity > 0 {
            if self.history.len() == self.history_capacity {
                self.history.pop_front();
                self.dropped_history += 1;
            }
            self.history.push_back(event.clone());
        } else {
            self.dropped_history += 1;
        }

        // No receivers is not an error
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MetricEvent> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            recent: self.history.iter().cloned().collect(),
            total_events: self.total_events,
            dropped_events: self.dropped_history,
        }
    }

    pub fn record_lifecycle(&mut self, phase: LifecyclePhase) {
        self.publish(MetricEvent::SessionLifecycle {
            phase,
            timestamp_ms: now_timestamp_ms(),
        });
    }

    pub fn record_error(&mut self, code: i32, context: impl Into<String>) {
        self.publish(MetricEvent::Error {
            code,
            context: context.into(),
        });
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::from_config(&TelemetryConfig::default())
    }
}

fn now_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::TryRecvError;

    fn repetition(n: u32) -> MetricEvent {
        MetricEvent::Repetition {
            repetition_number: n,
            cumulative_time: n as f64,
            interval: 1.0,
            rpm: 60.0,
        }
    }

    #[test]
    fn collector_preserves_order_within_history() {
        let mut collector = TelemetryCollector::new(8, 3);
        collector.publish(repetition(1));
        collector.publish(MetricEvent::CalibrationComplete { threshold_y: 0.86 });
        collector.publish(repetition(2));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.recent.len(), 3);
        assert_eq!(snapshot.recent[0], repetition(1));
        assert!(matches!(
            snapshot.recent[1],
            MetricEvent::CalibrationComplete { .. }
        ));
    }

    #[test]
    fn collector_drops_history_when_full() {
        let mut collector = TelemetryCollector::new(8, 2);
        collector.publish(repetition(1));
        collector.publish(repetition(2));
        collector.publish(repetition(3));

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.recent.len(), 2);
        assert_eq!(snapshot.total_events, 3);
        assert_eq!(snapshot.dropped_events, 1);
        assert_eq!(snapshot.recent[0], repetition(2));
    }

    #[test]
    fn subscribers_receive_events_without_runtime() {
        let mut collector = TelemetryCollector::new(8, 8);
        let mut rx = collector.subscribe();
        collector.record_lifecycle(LifecyclePhase::SessionStarted);
        collector.publish(repetition(1));

        assert!(matches!(
            rx.try_recv(),
            Ok(MetricEvent::SessionLifecycle {
                phase: LifecyclePhase::SessionStarted,
                ..
            })
        ));
        assert_eq!(rx.try_recv().unwrap(), repetition(1));
        assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let mut collector = TelemetryCollector::default();
        collector.record_error(3006, "export");
        assert_eq!(collector.snapshot().total_events, 1);
    }

    #[test]
    fn event_json_is_tagged() {
        let json = serde_json::to_value(repetition(4)).unwrap();
        assert_eq!(json["type"], "repetition");
        assert_eq!(json["payload"]["repetition_number"], 4);
    }
}
