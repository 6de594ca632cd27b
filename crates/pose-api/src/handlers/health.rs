//! Health check handler.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub model: ModelStatus,
}

#[derive(Serialize)]
pub struct ModelStatus {
    pub loaded: bool,
    pub architecture: String,
    pub output_stride: u32,
    pub square_resolution: u32,
}

/// Liveness probe. Never triggers a model load.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let model = state.pose.model();
    let config = model.config();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
        model: ModelStatus {
            loaded: model.is_loaded(),
            architecture: config.architecture.to_string(),
            output_stride: config.output_stride,
            square_resolution: config.square_resolution,
        },
    })
}
