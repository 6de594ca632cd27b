//! Single-pose estimation pipeline.

use std::sync::Arc;
use std::time::Instant;

use pose_engine::{rescale_pose, EngineError, EstimateOptions, ModelHandle, ScaleFactors};
use pose_media::prepare_canvas;
use pose_models::Pose;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::metrics;

/// Runs one estimate per request against the shared model.
#[derive(Clone)]
pub struct PoseService {
    model: Arc<ModelHandle>,
}

impl PoseService {
    pub fn new(model: Arc<ModelHandle>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Estimate a pose for `data_uri`, returned in source image pixels.
    ///
    /// The model is loaded before the image is touched. Decoding, drawing and
    /// inference then run on the blocking pool against a canvas owned by this
    /// request alone.
    pub async fn estimate(&self, data_uri: String) -> ApiResult<Pose> {
        let result = self.run(data_uri).await;
        match &result {
            Ok(pose) => {
                metrics::record_estimate("ok");
                debug!(score = pose.score, "Pose estimated");
            }
            Err(e) => {
                metrics::record_estimate(e.code());
                warn!(error = %e, code = e.code(), "Pose estimate failed");
            }
        }
        result
    }

    async fn run(&self, data_uri: String) -> ApiResult<Pose> {
        let estimator = self.model.get().await?;
        let side = self.model.config().square_resolution;

        let pose = tokio::task::spawn_blocking(move || -> ApiResult<Pose> {
            let prepared = prepare_canvas(&data_uri, side)?;

            let start = Instant::now();
            let mut pose = estimator.estimate_single_pose(&prepared.canvas, EstimateOptions::default())?;
            metrics::record_inference_duration(start.elapsed().as_secs_f64());

            let factors = ScaleFactors::new(prepared.source_width, prepared.source_height, side);
            rescale_pose(&mut pose, factors);
            Ok(pose)
        })
        .await
        .map_err(|e| ApiError::from(EngineError::inference(format!("estimate task failed: {e}"))))??;

        Ok(pose)
    }
}
