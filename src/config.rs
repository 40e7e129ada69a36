//! Configuration management for runtime parameter tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! so calibration length, threshold placement, cadence window and export
//! location can be adjusted without recompilation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::DEFAULT_CADENCE_WINDOW;
use crate::calibration::procedure::DEFAULT_NUM_FRAMES;
use crate::calibration::state::DEFAULT_THRESHOLD_RATIO;

/// Default on-disk location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/jumprope.json";

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub calibration: CalibrationConfig,
    pub cadence: CadenceConfig,
    pub export: ExportConfig,
    pub telemetry: TelemetryConfig,
}

/// Calibration warm-up parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Number of detected frames in the warm-up window
    pub num_frames: usize,
    /// Fraction of the hip-to-ankle distance where the threshold sits
    pub threshold_ratio: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            num_frames: DEFAULT_NUM_FRAMES,
            threshold_ratio: DEFAULT_THRESHOLD_RATIO,
        }
    }
}

/// Rolling cadence parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceConfig {
    /// Repetitions (including the newest) in the rolling RPM window
    pub window_size: usize,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_CADENCE_WINDOW,
        }
    }
}

/// Session log export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the CSV log when the session ends
    pub enabled: bool,
    /// Directory receiving `jumps_<session_id>.csv`
    pub log_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Telemetry channel sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Broadcast channel capacity for live subscribers
    pub channel_capacity: usize,
    /// Number of recent events retained for snapshots
    pub history_capacity: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            history_capacity: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// The parsed configuration, or defaults if the file is missing or invalid.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Self {
        Self::load_from_file(DEFAULT_CONFIG_PATH)
    }
}
