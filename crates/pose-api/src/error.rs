//! API error types.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pose_engine::EngineError;
use pose_media::MediaError;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Decode(#[from] MediaError),

    #[error("{0}")]
    Engine(#[from] EngineError),

    /// A server error with its detail withheld from the client.
    #[error("An internal error occurred")]
    Redacted(&'static str),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Decode(MediaError::InvalidResolution(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(_) | ApiError::Redacted(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "invalid_request",
            ApiError::PayloadTooLarge(_) => "payload_too_large",
            ApiError::Decode(MediaError::InvalidResolution(_)) => "inference_error",
            ApiError::Decode(_) => "decode_error",
            ApiError::Engine(e) if e.is_load_error() => "model_load_error",
            ApiError::Engine(_) => "inference_error",
            ApiError::Redacted(code) => *code,
        }
    }

    /// Hide server error detail in production, keeping status and code.
    pub fn redact(self, production: bool) -> Self {
        if production && self.status_code().is_server_error() {
            ApiError::Redacted(self.code())
        } else {
            self
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
            code: self.code(),
        };

        (status, Json(body)).into_response()
    }
}
