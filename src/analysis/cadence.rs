//! Rolling cadence over the most recent repetitions.

use std::collections::VecDeque;

/// Number of repetitions (including the newest) in the rolling window
pub const DEFAULT_CADENCE_WINDOW: usize = 10;

/// Trailing window of repetition times.
///
/// ```text
/// rpm = (len(window) - 1) / (t_newest - t_oldest) * 60
/// ```
///
/// Fewer than two entries or a zero time span yield `0.0`; degenerate input
/// is never an error.
#[derive(Debug, Clone)]
pub struct CadenceWindow {
    times: VecDeque<f64>,
    size: usize,
}

impl CadenceWindow {
    /// Window sizes below 2 can never produce a cadence and are raised to 2.
    pub fn new(size: usize) -> Self {
        let size = if size < 2 {
            tracing::warn!("[CadenceWindow] Window size {} too small, using 2", size);
            2
        } else {
            size
        };
        Self {
            times: VecDeque::with_capacity(size),
            size,
        }
    }

    /// Push the newest repetition time and return the cadence including it
    pub fn observe(&mut self, cumulative_time: f64) -> f64 {
        if self.times.len() == self.size {
            self.times.pop_front();
        }
        self.times.push_back(cumulative_time);
        self.rpm()
    }

    /// Cadence over the current window contents
    pub fn rpm(&self) -> f64 {
        let (Some(&oldest), Some(&newest)) = (self.times.front(), self.times.back()) else {
            return 0.0;
        };
        if self.times.len() < 2 {
            return 0.0;
        }

        let time_span = newest - oldest;
        if time_span == 0.0 {
            return 0.0;
        }

        let intervals = (self.times.len() - 1) as f64;
        (intervals / time_span) * 60.0
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for CadenceWindow {
    fn default() -> Self {
        Self::new(DEFAULT_CADENCE_WINDOW)
    }
}
