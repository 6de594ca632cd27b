//! Process-wide model handle.
//!
//! The model moves `Unloaded -> Loaded` exactly once. Concurrent first callers
//! share one load; a failed load leaves the handle unloaded and is reported
//! to the caller that triggered it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use tokio::sync::OnceCell;
use tracing::{error, info};

use crate::config::ModelConfig;
use crate::error::EngineResult;
use crate::estimator::{ModelLoader, PoseEstimator};

const MODEL_LOADS_TOTAL: &str = "pose_model_loads_total";
const MODEL_LOAD_DURATION_SECONDS: &str = "pose_model_load_duration_seconds";

/// Lazily loaded, never reloaded pose model.
pub struct ModelHandle {
    config: ModelConfig,
    loader: Arc<dyn ModelLoader>,
    model: OnceCell<Arc<dyn PoseEstimator>>,
    load_attempts: AtomicUsize,
}

impl ModelHandle {
    pub fn new(config: ModelConfig, loader: Arc<dyn ModelLoader>) -> Self {
        Self {
            config,
            loader,
            model: OnceCell::new(),
            load_attempts: AtomicUsize::new(0),
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Get the model, loading it on first use.
    pub async fn get(&self) -> EngineResult<Arc<dyn PoseEstimator>> {
        let model = self.model.get_or_try_init(|| self.load()).await?;
        Ok(Arc::clone(model))
    }

    pub fn is_loaded(&self) -> bool {
        self.model.initialized()
    }

    /// Number of times the loader has been invoked.
    pub fn load_count(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }

    async fn load(&self) -> EngineResult<Arc<dyn PoseEstimator>> {
        self.load_attempts.fetch_add(1, Ordering::SeqCst);
        info!(
            architecture = %self.config.architecture,
            output_stride = self.config.output_stride,
            square_resolution = self.config.square_resolution,
            quant_bytes = self.config.quant_bytes,
            "Loading pose model"
        );

        let start = Instant::now();
        let result = self.loader.load(&self.config).await;
        let elapsed = start.elapsed();

        let outcome = if result.is_ok() { "ok" } else { "error" };
        counter!(MODEL_LOADS_TOTAL, "outcome" => outcome).increment(1);
        histogram!(MODEL_LOAD_DURATION_SECONDS).record(elapsed.as_secs_f64());

        match &result {
            Ok(_) => info!(duration_ms = %elapsed.as_millis(), "Pose model loaded"),
            Err(e) => error!(error = %e, "Pose model load failed"),
        }
        result
    }
}
