//! Source image decoding and square normalization.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbImage};
use tracing::debug;

use crate::canvas::Canvas;
use crate::data_uri::parse_data_uri;
use crate::error::{MediaError, MediaResult};

/// A decoded client image with its source dimensions.
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    width: u32,
    height: u32,
}

impl SourceImage {
    /// Decode raw bytes, guessing the format from content.
    pub fn decode(bytes: &[u8]) -> MediaResult<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| MediaError::unsupported_image(e.to_string()))?;
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(MediaError::EmptyImage);
        }
        Ok(Self {
            image,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill-resize to exactly `side × side` with nearest-neighbour sampling.
    ///
    /// Aspect ratio is not preserved. Alpha is dropped.
    pub fn resize_fill(&self, side: u32) -> RgbImage {
        let rgb = self.image.to_rgb8();
        imageops::resize(&rgb, side, side, FilterType::Nearest)
    }
}

/// A request image drawn onto its square surface.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub source_width: u32,
    pub source_height: u32,
    pub canvas: Canvas,
}

/// Decode a data URI and draw it onto a fresh `side × side` canvas.
pub fn prepare_canvas(data_uri: &str, side: u32) -> MediaResult<PreparedImage> {
    let mut canvas = Canvas::new(side)?;
    let uri = parse_data_uri(data_uri)?;
    let source = SourceImage::decode(&uri.data)?;

    debug!(
        media_type = %uri.media_type,
        width = source.width(),
        height = source.height(),
        side,
        "Decoded source image"
    );

    canvas.draw(&source.resize_fill(side));

    Ok(PreparedImage {
        source_width: source.width(),
        source_height: source.height(),
        canvas,
    })
}
