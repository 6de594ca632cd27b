//! Pose models.

use serde::{Deserialize, Serialize};

use crate::part::Part;

/// Pixel position of a keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A single named keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    /// Confidence (0.0-1.0)
    pub score: f64,
    pub part: Part,
    pub position: Position,
}

impl Keypoint {
    pub fn new(part: Part, score: f64, x: f64, y: f64) -> Self {
        Self {
            score,
            part,
            position: Position::new(x, y),
        }
    }
}

/// Single-person pose estimate.
///
/// Serialized exactly as PoseNet reports it:
/// `{"score": .., "keypoints": [{"score", "part", "position": {"x", "y"}}]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Mean of the keypoint scores
    pub score: f64,
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    /// Build a pose, scoring it as the mean keypoint confidence.
    pub fn from_keypoints(keypoints: Vec<Keypoint>) -> Self {
        let score = if keypoints.is_empty() {
            0.0
        } else {
            keypoints.iter().map(|k| k.score).sum::<f64>() / keypoints.len() as f64
        };
        Self { score, keypoints }
    }

    /// Look up a keypoint by part.
    pub fn get(&self, part: Part) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.part == part)
    }

    /// True when all 17 parts are present in channel order.
    pub fn is_complete(&self) -> bool {
        self.keypoints.len() == Part::COUNT
            && self
                .keypoints
                .iter()
                .zip(Part::ALL)
                .all(|(k, part)| k.part == part)
    }

    /// Multiply every keypoint position in place.
    pub fn scale(&mut self, x_scale: f64, y_scale: f64) {
        for keypoint in &mut self.keypoints {
            keypoint.position.x *= x_scale;
            keypoint.position.y *= y_scale;
        }
    }
}
