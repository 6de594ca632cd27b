//! Error types for image intake.

use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors raised while turning a request payload into a model surface.
///
/// Every variant is a client-side input problem.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Data URI has an empty payload")]
    EmptyPayload,

    #[error("Unsupported or corrupt image: {0}")]
    UnsupportedImage(String),

    #[error("Image has zero width or height")]
    EmptyImage,

    #[error("Invalid surface resolution: {0}")]
    InvalidResolution(u32),
}

impl MediaError {
    pub fn invalid_data_uri(message: impl Into<String>) -> Self {
        Self::InvalidDataUri(message.into())
    }

    pub fn unsupported_image(message: impl Into<String>) -> Self {
        Self::UnsupportedImage(message.into())
    }
}
