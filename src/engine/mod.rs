//! Engine module housing the frame-driven counting driver.
//!
//! `JumpEngine` (`core`) wires landmark frames through the calibrator, the
//! repetition detector and the session recorder in strict frame order.
//! `snapshot` holds the read-only view handed to renderers.

pub mod core;
pub mod snapshot;

pub use self::core::{FrameOutcome, FrameStats, JumpEngine, SessionReport};
pub use self::snapshot::{BaselineStatus, FrameSnapshot, Renderer};
