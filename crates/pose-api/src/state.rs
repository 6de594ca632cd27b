//! Application state.

use std::sync::Arc;

use pose_engine::{ModelConfig, ModelHandle, ModelLoader, OrtModelLoader};

use crate::config::ApiConfig;
use crate::services::PoseService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub pose: PoseService,
}

impl AppState {
    /// Create state backed by the ONNX Runtime model loader.
    ///
    /// Nothing is loaded here; the model loads on the first estimate.
    pub fn new(config: ApiConfig, model_config: ModelConfig) -> Self {
        Self::with_loader(config, model_config, Arc::new(OrtModelLoader))
    }

    /// Create state with a custom model loader.
    pub fn with_loader(config: ApiConfig, model_config: ModelConfig, loader: Arc<dyn ModelLoader>) -> Self {
        let model = Arc::new(ModelHandle::new(model_config, loader));
        Self {
            config,
            pose: PoseService::new(model),
        }
    }
}
