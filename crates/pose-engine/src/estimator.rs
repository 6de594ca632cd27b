//! Estimator and loader seams.

use std::sync::Arc;

use async_trait::async_trait;
use pose_media::Canvas;
use pose_models::Pose;

use crate::config::ModelConfig;
use crate::error::EngineResult;

/// Options for a single-pose estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EstimateOptions {
    /// Mirror keypoints horizontally across the canvas
    pub flip_horizontal: bool,
}

/// A loaded pose model.
///
/// Implementations are CPU-bound and synchronous; async callers should run
/// them on the blocking pool.
pub trait PoseEstimator: Send + Sync {
    /// Estimate one pose over `canvas`.
    ///
    /// Keypoint positions are in canvas pixel space (`0..canvas.side()`).
    fn estimate_single_pose(&self, canvas: &Canvas, options: EstimateOptions) -> EngineResult<Pose>;
}

/// Creates a `PoseEstimator` from configuration.
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, config: &ModelConfig) -> EngineResult<Arc<dyn PoseEstimator>>;
}
