//! RFC 2397 data URI decoding.
//!
//! `data:[<mediatype>][;base64],<payload>`
//!
//! The media type is reported but never trusted; image formats are sniffed
//! from the decoded bytes.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::error::{MediaError, MediaResult};

const SCHEME: &str = "data:";

/// Media type assumed when the URI omits one.
pub const DEFAULT_MEDIA_TYPE: &str = "text/plain;charset=US-ASCII";

/// Standard alphabet, padding optional.
const BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    /// Declared media type including parameters (e.g. `image/png`)
    pub media_type: String,
    /// Whether the payload was base64 encoded
    pub base64: bool,
    /// Decoded payload bytes
    pub data: Vec<u8>,
}

/// Parse a data URI into its payload bytes.
pub fn parse_data_uri(uri: &str) -> MediaResult<DataUri> {
    let uri = uri.trim();

    let has_scheme = uri
        .get(..SCHEME.len())
        .is_some_and(|s| s.eq_ignore_ascii_case(SCHEME));
    if !has_scheme {
        return Err(MediaError::invalid_data_uri("missing `data:` scheme"));
    }

    let rest = &uri[SCHEME.len()..];
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| MediaError::invalid_data_uri("missing `,` separating metadata and payload"))?;

    let (media_type, base64) = parse_meta(meta);

    let unescaped = urlencoding::decode_binary(payload.as_bytes());
    let data = if base64 {
        let compact: Vec<u8> = unescaped
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        BASE64.decode(compact)?
    } else {
        unescaped.into_owned()
    };

    if data.is_empty() {
        return Err(MediaError::EmptyPayload);
    }

    Ok(DataUri {
        media_type,
        base64,
        data,
    })
}

/// Split `[<mediatype>][;param]*[;base64]` into the media type and base64 flag.
fn parse_meta(meta: &str) -> (String, bool) {
    let mut base64 = false;
    let mut parts: Vec<&str> = Vec::new();

    for (i, part) in meta.split(';').enumerate() {
        let part = part.trim();
        if i > 0 && part.eq_ignore_ascii_case("base64") {
            base64 = true;
            continue;
        }
        parts.push(part);
    }

    let media_type = match parts.first() {
        Some(t) if !t.is_empty() => parts.join(";"),
        _ if parts.len() > 1 => format!("text/plain{}", parts.join(";")),
        _ => DEFAULT_MEDIA_TYPE.to_string(),
    };

    (media_type, base64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_png_uri() {
        let uri = parse_data_uri("data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(uri.media_type, "image/png");
        assert!(uri.base64);
        assert_eq!(uri.data, b"hello");
    }

    #[test]
    fn test_missing_padding_and_whitespace() {
        let uri = parse_data_uri("  data:image/jpeg;base64,aGVs\nbG8  ").unwrap();
        assert_eq!(uri.data, b"hello");
    }

    #[test]
    fn test_percent_escaped_base64() {
        let uri = parse_data_uri("data:image/png;base64,aGVsbG8%3D").unwrap();
        assert_eq!(uri.data, b"hello");

        // `+` is a base64 digit, not an escaped space.
        let uri = parse_data_uri("data:image/png;base64,+/8%2B").unwrap();
        assert_eq!(uri.data, vec![0xfb, 0xff, 0x3e]);
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let uri = parse_data_uri("DATA:image/png;BASE64,aGk=").unwrap();
        assert!(uri.base64);
        assert_eq!(uri.data, b"hi");
    }

    #[test]
    fn test_percent_encoded_payload() {
        let uri = parse_data_uri("data:,Hello%2C%20World").unwrap();
        assert_eq!(uri.media_type, DEFAULT_MEDIA_TYPE);
        assert!(!uri.base64);
        assert_eq!(uri.data, b"Hello, World");
    }

    #[test]
    fn test_parameters_without_type() {
        let uri = parse_data_uri("data:;charset=utf-8,x").unwrap();
        assert_eq!(uri.media_type, "text/plain;charset=utf-8");
    }

    #[test]
    fn test_missing_scheme() {
        let err = parse_data_uri("http://example.com/a.png").unwrap_err();
        assert!(matches!(err, MediaError::InvalidDataUri(_)));
    }

    #[test]
    fn test_missing_comma() {
        let err = parse_data_uri("data:image/png;base64").unwrap_err();
        assert!(matches!(err, MediaError::InvalidDataUri(_)));
    }

    #[test]
    fn test_bad_base64() {
        let err = parse_data_uri("data:image/png;base64,@@@@").unwrap_err();
        assert!(matches!(err, MediaError::InvalidBase64(_)));
    }

    #[test]
    fn test_empty_payload() {
        let err = parse_data_uri("data:image/png;base64,").unwrap_err();
        assert!(matches!(err, MediaError::EmptyPayload));
    }
}
