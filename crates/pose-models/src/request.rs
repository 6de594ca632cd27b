//! Request models.

use serde::{Deserialize, Serialize};

/// Body of `POST /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimateRequest {
    /// Data URI carrying the encoded image
    pub url: String,
}

impl EstimateRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extra_fields_are_ignored() {
        let req: EstimateRequest =
            serde_json::from_str(r#"{"url": "data:,x", "flip": true}"#).unwrap();
        assert_eq!(req.url, "data:,x");
    }

    #[test]
    fn test_missing_url_is_rejected() {
        assert!(serde_json::from_str::<EstimateRequest>("{}").is_err());
    }
}
