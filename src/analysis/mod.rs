//! Analysis module - repetition detection and cadence
//!
//! - [`repetition`]: two-state hysteresis machine turning ankle heights into
//!   discrete repetition events. This is the only implementation of the
//!   threshold-crossing rule in the crate.
//! - [`cadence`]: trailing window over repetition times producing a rolling
//!   repetitions-per-minute figure.

pub mod cadence;
pub mod repetition;

pub use cadence::{CadenceWindow, DEFAULT_CADENCE_WINDOW};
pub use repetition::{DetectorState, RepetitionDetector, RepetitionEvent};
