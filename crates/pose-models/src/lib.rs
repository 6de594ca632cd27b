//! Shared wire models for the pose estimation service.
//!
//! This crate provides Serde-serializable types for:
//! - The estimate request (`{"url": "<data uri>"}`)
//! - Body parts and their fixed PoseNet ordering
//! - Poses, keypoints and positions as returned to clients

pub mod part;
pub mod pose;
pub mod request;

// Re-export common types
pub use part::{Part, PartParseError};
pub use pose::{Keypoint, Pose, Position};
pub use request::EstimateRequest;
