//! Square RGB draw surface.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::error::{MediaError, MediaResult};

/// Fixed-size square surface the model reads from.
///
/// Each request owns its own canvas, so a draw can never be observed by
/// another request's inference.
#[derive(Debug, Clone)]
pub struct Canvas {
    side: u32,
    pixels: RgbImage,
}

impl Canvas {
    /// Allocate a black `side × side` canvas.
    pub fn new(side: u32) -> MediaResult<Self> {
        if side == 0 {
            return Err(MediaError::InvalidResolution(side));
        }
        Ok(Self {
            side,
            pixels: RgbImage::new(side, side),
        })
    }

    pub fn side(&self) -> u32 {
        self.side
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Draw `image` at the origin, stretched to cover the whole canvas.
    ///
    /// Previous contents are fully overwritten.
    pub fn draw(&mut self, image: &RgbImage) {
        if image.dimensions() == (self.side, self.side) {
            imageops::replace(&mut self.pixels, image, 0, 0);
        } else {
            let fitted = imageops::resize(image, self.side, self.side, FilterType::Nearest);
            imageops::replace(&mut self.pixels, &fitted, 0, 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_zero_side_rejected() {
        assert!(matches!(Canvas::new(0), Err(MediaError::InvalidResolution(0))));
    }

    #[test]
    fn test_draw_overwrites_previous_contents() {
        let mut canvas = Canvas::new(4).unwrap();
        canvas.draw(&RgbImage::from_pixel(4, 4, Rgb([255, 0, 0])));
        canvas.draw(&RgbImage::from_pixel(4, 4, Rgb([0, 0, 255])));
        assert!(canvas.pixels().pixels().all(|p| *p == Rgb([0, 0, 255])));
    }

    #[test]
    fn test_draw_stretches_mismatched_image() {
        let mut canvas = Canvas::new(8).unwrap();
        canvas.draw(&RgbImage::from_pixel(2, 3, Rgb([9, 9, 9])));
        assert_eq!(canvas.pixels().dimensions(), (8, 8));
        assert!(canvas.pixels().pixels().all(|p| *p == Rgb([9, 9, 9])));
    }
}
