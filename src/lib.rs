// Jump Rope Counter Core - Rust counting engine
// Pose-landmark driven repetition counting with session logging

// Module declarations
pub mod analysis;
pub mod calibration;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod pose;
pub mod session;
pub mod telemetry;

// Re-exports for convenience
pub use config::AppConfig;
pub use engine::{FrameOutcome, FrameSnapshot, JumpEngine, Renderer, SessionReport};
pub use pose::{FrameInput, Joint, Landmark, LandmarkFrame, LandmarkSource};
pub use session::{RepetitionRecord, SessionRecorder, SessionSummary};

use tracing::Level;

/// Install a stderr `tracing` subscriber (also captures `log` records).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(false);
        init_logging(true);
    }
}
