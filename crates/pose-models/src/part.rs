//! Body part identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the 17 keypoints PoseNet reports, in model channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[repr(usize)]
pub enum Part {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

/// Unknown part name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown body part: {0}")]
pub struct PartParseError(pub String);

impl Part {
    /// Number of keypoints in a pose.
    pub const COUNT: usize = 17;

    /// All parts in model channel order.
    pub const ALL: [Part; Part::COUNT] = [
        Part::Nose,
        Part::LeftEye,
        Part::RightEye,
        Part::LeftEar,
        Part::RightEar,
        Part::LeftShoulder,
        Part::RightShoulder,
        Part::LeftElbow,
        Part::RightElbow,
        Part::LeftWrist,
        Part::RightWrist,
        Part::LeftHip,
        Part::RightHip,
        Part::LeftKnee,
        Part::RightKnee,
        Part::LeftAnkle,
        Part::RightAnkle,
    ];

    /// Channel index of this part in the model outputs.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Wire name (camelCase, as PoseNet reports it).
    pub fn as_str(self) -> &'static str {
        match self {
            Part::Nose => "nose",
            Part::LeftEye => "leftEye",
            Part::RightEye => "rightEye",
            Part::LeftEar => "leftEar",
            Part::RightEar => "rightEar",
            Part::LeftShoulder => "leftShoulder",
            Part::RightShoulder => "rightShoulder",
            Part::LeftElbow => "leftElbow",
            Part::RightElbow => "rightElbow",
            Part::LeftWrist => "leftWrist",
            Part::RightWrist => "rightWrist",
            Part::LeftHip => "leftHip",
            Part::RightHip => "rightHip",
            Part::LeftKnee => "leftKnee",
            Part::RightKnee => "rightKnee",
            Part::LeftAnkle => "leftAnkle",
            Part::RightAnkle => "rightAnkle",
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Part {
    type Err = PartParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Part::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| PartParseError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_position_in_all() {
        for (i, part) in Part::ALL.iter().enumerate() {
            assert_eq!(part.index(), i);
            assert_eq!(Part::from_index(i), Some(*part));
        }
        assert_eq!(Part::from_index(Part::COUNT), None);
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for part in Part::ALL {
            let json = serde_json::to_string(&part).unwrap();
            assert_eq!(json, format!("\"{}\"", part.as_str()));
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("leftShoulder".parse::<Part>(), Ok(Part::LeftShoulder));
        assert_eq!("rightAnkle".parse::<Part>(), Ok(Part::RightAnkle));
        assert!("left_shoulder".parse::<Part>().is_err());
    }
}
