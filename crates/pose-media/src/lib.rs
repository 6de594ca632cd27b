//! Image intake for pose estimation.
//!
//! This crate provides:
//! - RFC 2397 data URI decoding (base64 and percent-encoded payloads)
//! - Image decoding with format sniffing and dimension inspection
//! - Nearest-neighbour fill resize to a fixed square resolution
//! - The square draw surface handed to the model

pub mod canvas;
pub mod data_uri;
pub mod error;
pub mod source;

pub use canvas::Canvas;
pub use data_uri::{parse_data_uri, DataUri};
pub use error::{MediaError, MediaResult};
pub use source::{prepare_canvas, PreparedImage, SourceImage};
