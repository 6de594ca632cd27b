//! Canvas to input tensor conversion.

use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::config::Architecture;

/// Per-channel offsets added to raw RGB for the ResNet50 backbone.
pub const IMAGENET_MEAN_OFFSET: [f32; 3] = [-123.15, -115.90, -103.06];

/// Build an NHWC `[1, resolution, resolution, 3]` input buffer.
///
/// - Bilinear resize to the network resolution (skipped when already there)
/// - ResNet50: raw RGB plus the ImageNet mean offsets
/// - MobileNetV1: RGB mapped to `[-1, 1]`
pub fn to_input_tensor(pixels: &RgbImage, resolution: u32, architecture: Architecture) -> Vec<f32> {
    let resized;
    let source = if pixels.dimensions() == (resolution, resolution) {
        pixels
    } else {
        resized = imageops::resize(pixels, resolution, resolution, FilterType::Triangle);
        &resized
    };

    let mut data = Vec::with_capacity((resolution * resolution * 3) as usize);
    for pixel in source.pixels() {
        for c in 0..3 {
            let value = pixel[c] as f32;
            data.push(match architecture {
                Architecture::ResNet50 => value + IMAGENET_MEAN_OFFSET[c],
                Architecture::MobileNetV1 => value / 127.5 - 1.0,
            });
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;

    #[test]
    fn test_resnet_offsets() {
        let img = RgbImage::from_pixel(3, 3, Rgb([200, 100, 50]));
        let data = to_input_tensor(&img, 3, Architecture::ResNet50);
        assert_eq!(data.len(), 27);
        assert!((data[0] - (200.0 - 123.15)).abs() < 1e-4);
        assert!((data[1] - (100.0 - 115.90)).abs() < 1e-4);
        assert!((data[2] - (50.0 - 103.06)).abs() < 1e-4);
    }

    #[test]
    fn test_mobilenet_range() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let data = to_input_tensor(&img, 2, Architecture::MobileNetV1);
        assert_eq!(data.len(), 12);
        assert_eq!(data[0], -1.0);
        assert_eq!(data[3], 1.0);
        assert!(data.iter().all(|v| (-1.0..=1.0).contains(v)));
    }

    #[test]
    fn test_resizes_to_network_resolution() {
        let img = RgbImage::from_pixel(250, 250, Rgb([10, 20, 30]));
        let data = to_input_tensor(&img, 225, Architecture::ResNet50);
        assert_eq!(data.len(), 225 * 225 * 3);
    }
}
