// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Model input preparation — resize to the model frame and lay the pixels out
// as a normalised (1, 3, H, W) tensor.

use image::DynamicImage;
use image::imageops::FilterType;
use richtwerk_core::RichtwerkError;
use richtwerk_core::error::Result;
use rten_tensor::NdTensor;
use tracing::debug;

/// Resize `image` to exactly `width` x `height` and convert it to a planar
/// RGB tensor with values in `[0, 1]`.
///
/// Alpha is discarded. The aspect ratio is not preserved: the model frame is
/// fixed and the orchestrator rescales its output back per axis.
pub fn normalize_to_tensor(image: &DynamicImage, width: u32, height: u32) -> Result<NdTensor<f32, 4>> {
    if image.width() == 0 || image.height() == 0 {
        return Err(RichtwerkError::Normalization(format!(
            "source image is empty ({}x{})",
            image.width(),
            image.height()
        )));
    }
    if width == 0 || height == 0 {
        return Err(RichtwerkError::Normalization(format!(
            "model input size is empty ({width}x{height})"
        )));
    }

    let resized = image.resize_exact(width, height, FilterType::Triangle).to_rgb8();
    debug!(
        from_width = image.width(),
        from_height = image.height(),
        width,
        height,
        "Resized image for model input"
    );

    let (w, h) = (width as usize, height as usize);
    let plane = w * h;
    let mut data = vec![0.0f32; 3 * plane];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let offset = y as usize * w + x as usize;
        for (channel, value) in pixel.0.iter().enumerate() {
            data[channel * plane + offset] = f32::from(*value) / 255.0;
        }
    }

    Ok(NdTensor::from_data([1, 3, h, w], data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, RgbaImage};
    use rten_tensor::prelude::*;

    #[test]
    fn layout_is_planar_and_normalised() {
        let mut img = RgbImage::from_pixel(4, 2, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 51, 0]));
        let tensor = normalize_to_tensor(&DynamicImage::ImageRgb8(img), 4, 2).unwrap();

        assert_eq!(tensor.shape(), [1, 3, 2, 4]);
        assert_eq!(tensor[[0, 0, 0, 1]], 1.0);
        assert!((tensor[[0, 1, 0, 1]] - 0.2).abs() < 1e-6);
        assert_eq!(tensor[[0, 2, 0, 1]], 0.0);
        assert_eq!(tensor[[0, 0, 1, 3]], 0.0);
    }

    #[test]
    fn values_stay_in_unit_range() {
        let img = RgbaImage::from_fn(37, 23, |x, y| {
            image::Rgba([(x * 7) as u8, (y * 11) as u8, 255, (x + y) as u8])
        });
        let tensor = normalize_to_tensor(&DynamicImage::ImageRgba8(img), 16, 16).unwrap();
        assert_eq!(tensor.shape(), [1, 3, 16, 16]);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn empty_source_or_target_is_error() {
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 5));
        assert!(matches!(
            normalize_to_tensor(&empty, 8, 8),
            Err(RichtwerkError::Normalization(_))
        ));

        let img = DynamicImage::ImageRgb8(RgbImage::new(5, 5));
        assert!(matches!(
            normalize_to_tensor(&img, 0, 8),
            Err(RichtwerkError::Normalization(_))
        ));
    }
}
