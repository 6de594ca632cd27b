//! Pose estimate handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use pose_models::{EstimateRequest, Pose};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `POST /`: estimate a single pose from a data URI image.
pub async fn estimate_pose(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> ApiResult<Json<Pose>> {
    let Json(request) = payload?;
    if request.url.trim().is_empty() {
        return Err(ApiError::bad_request("url must not be empty"));
    }

    let pose = state
        .pose
        .estimate(request.url)
        .await
        .map_err(|e| e.redact(state.config.is_production()))?;
    Ok(Json(pose))
}
