//! Body-landmark data model consumed by the counting core.
//!
//! A [`LandmarkFrame`] is the per-frame output of an external pose estimator:
//! normalized 2-D coordinates (`x`, `y` in `[0, 1]`, `y` growing downward)
//! keyed by [`Joint`]. The core only ever looks at hips and ankles, through
//! [`LowerBody`], so the averaging rule lives in exactly one place.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod source;

pub use source::{LandmarkSource, RecordedSource};

/// Tracked body joints with their index in the 33-point pose model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const ALL: [Joint; 13] = [
        Joint::Nose,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Index of this joint in the 33-point pose landmark list
    pub fn model_index(&self) -> usize {
        match self {
            Joint::Nose => 0,
            Joint::LeftShoulder => 11,
            Joint::RightShoulder => 12,
            Joint::LeftElbow => 13,
            Joint::RightElbow => 14,
            Joint::LeftWrist => 15,
            Joint::RightWrist => 16,
            Joint::LeftHip => 23,
            Joint::RightHip => 24,
            Joint::LeftKnee => 25,
            Joint::RightKnee => 26,
            Joint::LeftAnkle => 27,
            Joint::RightAnkle => 28,
        }
    }

    /// Reverse of [`Joint::model_index`]
    pub fn from_model_index(index: usize) -> Option<Joint> {
        Joint::ALL.iter().copied().find(|j| j.model_index() == index)
    }
}

/// Normalized 2-D screen coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Landmarks detected in a single video frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: BTreeMap<Joint, Landmark>,
}

impl LandmarkFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, joint: Joint, landmark: Landmark) -> Self {
        self.points.insert(joint, landmark);
        self
    }

    pub fn set(&mut self, joint: Joint, landmark: Landmark) {
        self.points.insert(joint, landmark);
    }

    pub fn get(&self, joint: Joint) -> Option<Landmark> {
        self.points.get(&joint).copied()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Build a frame from a raw pose-model landmark list indexed by model index.
    ///
    /// Indices that do not correspond to a tracked [`Joint`] are ignored.
    pub fn from_indexed(points: &[(f64, f64)]) -> Self {
        let mut frame = Self::new();
        for joint in Joint::ALL {
            if let Some(&(x, y)) = points.get(joint.model_index()) {
                frame.set(joint, Landmark::new(x, y));
            }
        }
        frame
    }

    /// Convenience constructor for a frame carrying only hips and ankles,
    /// left and right sides at the same height.
    pub fn standing(hip_y: f64, ankle_y: f64) -> Self {
        Self::new()
            .with(Joint::LeftHip, Landmark::new(0.45, hip_y))
            .with(Joint::RightHip, Landmark::new(0.55, hip_y))
            .with(Joint::LeftAnkle, Landmark::new(0.45, ankle_y))
            .with(Joint::RightAnkle, Landmark::new(0.55, ankle_y))
    }

    pub fn lower_body(&self) -> Option<LowerBody> {
        LowerBody::from_frame(self)
    }
}

/// The four joints the counting core depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowerBody {
    pub hip_left: Landmark,
    pub hip_right: Landmark,
    pub ankle_left: Landmark,
    pub ankle_right: Landmark,
}

impl LowerBody {
    /// `None` if any hip or ankle is missing; such frames count as "no detection".
    pub fn from_frame(frame: &LandmarkFrame) -> Option<Self> {
        Some(Self {
            hip_left: frame.get(Joint::LeftHip)?,
            hip_right: frame.get(Joint::RightHip)?,
            ankle_left: frame.get(Joint::LeftAnkle)?,
            ankle_right: frame.get(Joint::RightAnkle)?,
        })
    }

    pub fn hip_y(&self) -> f64 {
        (self.hip_left.y + self.hip_right.y) / 2.0
    }

    pub fn ankle_y(&self) -> f64 {
        (self.ankle_left.y + self.ankle_right.y) / 2.0
    }

    /// Averaged ankle coordinate, used both for detection and the on-screen marker
    pub fn ankle_position(&self) -> Landmark {
        Landmark::new(
            (self.ankle_left.x + self.ankle_right.x) / 2.0,
            self.ankle_y(),
        )
    }
}

/// One tick of the landmark stream.
///
/// `landmarks == None` is the explicit "no detection this frame" signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    /// Seconds since the start of the stream
    #[serde(rename = "t")]
    pub timestamp: f64,
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

impl FrameInput {
    pub fn detected(timestamp: f64, landmarks: LandmarkFrame) -> Self {
        Self {
            timestamp,
            landmarks: Some(landmarks),
        }
    }

    pub fn missing(timestamp: f64) -> Self {
        Self {
            timestamp,
            landmarks: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_index_roundtrip() {
        for joint in Joint::ALL {
            assert_eq!(Joint::from_model_index(joint.model_index()), Some(joint));
        }
        assert_eq!(Joint::from_model_index(23), Some(Joint::LeftHip));
        assert_eq!(Joint::from_model_index(28), Some(Joint::RightAnkle));
        assert_eq!(Joint::from_model_index(32), None);
    }

    #[test]
    fn test_lower_body_averages_left_and_right() {
        let frame = LandmarkFrame::new()
            .with(Joint::LeftHip, Landmark::new(0.4, 0.50))
            .with(Joint::RightHip, Landmark::new(0.6, 0.52))
            .with(Joint::LeftAnkle, Landmark::new(0.4, 0.88))
            .with(Joint::RightAnkle, Landmark::new(0.6, 0.92));
        let body = frame.lower_body().unwrap();

        assert!((body.hip_y() - 0.51).abs() < 1e-12);
        assert!((body.ankle_y() - 0.90).abs() < 1e-12);
        let marker = body.ankle_position();
        assert!((marker.x - 0.5).abs() < 1e-12);
        assert!((marker.y - 0.90).abs() < 1e-12);
    }

    #[test]
    fn test_lower_body_requires_all_four_joints() {
        let frame = LandmarkFrame::standing(0.5, 0.9);
        assert!(frame.lower_body().is_some());

        let partial = LandmarkFrame::new()
            .with(Joint::LeftHip, Landmark::new(0.4, 0.5))
            .with(Joint::RightHip, Landmark::new(0.6, 0.5))
            .with(Joint::LeftAnkle, Landmark::new(0.4, 0.9));
        assert!(partial.lower_body().is_none());
    }

    #[test]
    fn test_from_indexed_picks_tracked_joints() {
        let mut raw = vec![(0.0, 0.0); 33];
        raw[23] = (0.4, 0.5);
        raw[24] = (0.6, 0.5);
        raw[27] = (0.4, 0.9);
        raw[28] = (0.6, 0.9);

        let frame = LandmarkFrame::from_indexed(&raw);
        assert_eq!(frame.len(), Joint::ALL.len());
        assert_eq!(frame.get(Joint::LeftAnkle), Some(Landmark::new(0.4, 0.9)));
        assert!((frame.lower_body().unwrap().hip_y() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_from_indexed_short_list_misses_lower_body() {
        let raw = vec![(0.5, 0.5); 20];
        let frame = LandmarkFrame::from_indexed(&raw);
        assert!(frame.get(Joint::Nose).is_some());
        assert!(frame.lower_body().is_none());
    }

    #[test]
    fn test_frame_input_json_shape() {
        let input = FrameInput::detected(0.5, LandmarkFrame::standing(0.5, 0.9));
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["t"], 0.5);
        assert_eq!(json["landmarks"]["left_hip"]["y"], 0.5);

        let missing: FrameInput = serde_json::from_str(r#"{"t": 1.0, "landmarks": null}"#).unwrap();
        assert!(missing.landmarks.is_none());

        let absent: FrameInput = serde_json::from_str(r#"{"t": 1.0}"#).unwrap();
        assert!(absent.landmarks.is_none());
    }
}
