//! Deterministic synthetic jumper for fixtures and tests.
//!
//! Produces a standing warm-up followed by `jumps` half-sine ankle lifts and a
//! short rest, sampled at `fps`. Jitter and dropout come from a seeded
//! [`StdRng`] so the same parameters always yield the same stream.

use std::f64::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::pose::{FrameInput, LandmarkFrame};

/// Parameters of a synthetic landmark stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticJumper {
    pub seed: u64,
    pub fps: f64,
    /// Standing frames emitted before the first jump (never dropped)
    pub calibration_frames: usize,
    pub jumps: usize,
    /// Seconds per jump
    pub period: f64,
    /// Peak ankle rise in normalized image units
    pub lift: f64,
    pub hip_y: f64,
    pub ankle_y: f64,
    /// Uniform noise amplitude added to every coordinate
    pub jitter: f64,
    /// Probability that a post-warm-up frame has no detection
    pub dropout: f64,
    /// Standing seconds after the last jump
    pub rest: f64,
}

impl Default for SyntheticJumper {
    fn default() -> Self {
        Self {
            seed: 7,
            fps: 30.0,
            calibration_frames: 30,
            jumps: 10,
            period: 0.5,
            lift: 0.12,
            hip_y: 0.5,
            ankle_y: 0.9,
            jitter: 0.003,
            dropout: 0.0,
            rest: 0.5,
        }
    }
}

impl SyntheticJumper {
    pub fn with_jumps(mut self, jumps: usize) -> Self {
        self.jumps = jumps;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Render the stream.
    pub fn generate(&self) -> Vec<FrameInput> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let fps = if self.fps > 0.0 { self.fps } else { 30.0 };
        let dt = 1.0 / fps;
        let frames_per_jump = ((self.period * fps).round() as usize).max(2);
        let rest_frames = (self.rest.max(0.0) * fps).round() as usize;
        let dropout = self.dropout.clamp(0.0, 1.0);

        let total = self.calibration_frames + self.jumps * frames_per_jump + rest_frames;
        let mut frames = Vec::with_capacity(total);

        for index in 0..total {
            let timestamp = index as f64 * dt;
            let lift = match index.checked_sub(self.calibration_frames) {
                Some(offset) if offset < self.jumps * frames_per_jump => {
                    let phase = (offset % frames_per_jump) as f64 / frames_per_jump as f64;
                    self.lift * (PI * phase).sin()
                }
                _ => 0.0,
            };

            let warm_up = index < self.calibration_frames;
            if !warm_up && dropout > 0.0 && rng.gen_bool(dropout) {
                frames.push(FrameInput::missing(timestamp));
                continue;
            }

            let hip_y = self.hip_y - lift + self.noise(&mut rng);
            let ankle_y = self.ankle_y - lift + self.noise(&mut rng);
            frames.push(FrameInput::detected(
                timestamp,
                LandmarkFrame::standing(hip_y, ankle_y),
            ));
        }

        frames
    }

    fn noise(&self, rng: &mut StdRng) -> f64 {
        if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..self.jitter)
        } else {
            0.0
        }
    }
}
