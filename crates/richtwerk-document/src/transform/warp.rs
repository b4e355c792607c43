// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective resampler — inverse-mapped warp of a source quadrilateral onto
// a rectangular canvas with bilinear sampling.

use image::{ImageBuffer, Rgba, RgbaImage};
use richtwerk_core::Point;
use thiserror::Error;
use tracing::debug;

use super::homography::Homography;

/// Colour written for samples that fall outside the source image.
pub const OUT_OF_BOUNDS: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Why a warp could not be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WarpError {
    #[error("expected 4 source corners, got {0}")]
    NotAQuadrilateral(usize),

    #[error("target canvas {width}x{height} is empty")]
    EmptyTarget { width: u32, height: u32 },

    #[error("homography is singular for the given corners")]
    SingularHomography,
}

/// Warp the region of `source` bounded by `quad` onto a `width` x `height`
/// canvas.
///
/// `quad` lists the source corners matching the destination corners
/// `(0,0)`, `(W-1,0)`, `(W-1,H-1)`, `(0,H-1)` in that order. The homography is
/// estimated from the destination rectangle to the source quadrilateral so
/// every output pixel pulls exactly one bilinear sample and no holes appear.
pub fn warp_perspective(
    source: &RgbaImage,
    quad: &[Point],
    width: u32,
    height: u32,
) -> Result<RgbaImage, WarpError> {
    let quad: &[Point; 4] = quad
        .try_into()
        .map_err(|_| WarpError::NotAQuadrilateral(quad.len()))?;
    if width == 0 || height == 0 {
        return Err(WarpError::EmptyTarget { width, height });
    }

    let (max_x, max_y) = (f64::from(width - 1), f64::from(height - 1));
    let target = [
        Point::new(0.0, 0.0),
        Point::new(max_x, 0.0),
        Point::new(max_x, max_y),
        Point::new(0.0, max_y),
    ];
    let homography =
        Homography::from_correspondences(&target, quad).ok_or(WarpError::SingularHomography)?;

    debug!(width, height, coefficients = ?homography.coefficients(), "Warping quadrilateral");

    Ok(ImageBuffer::from_fn(width, height, |x, y| {
        let src = homography.apply(Point::new(f64::from(x), f64::from(y)));
        sample_bilinear(source, src.x, src.y)
    }))
}

/// Bilinearly interpolate `image` at a fractional coordinate.
///
/// Coordinates outside `[0, w-1] x [0, h-1]` (including NaN) yield opaque
/// black.
pub fn sample_bilinear(image: &RgbaImage, x: f64, y: f64) -> Rgba<u8> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return OUT_OF_BOUNDS;
    }
    let in_bounds = x >= 0.0 && y >= 0.0 && x <= f64::from(w - 1) && y <= f64::from(h - 1);
    if !in_bounds {
        return OUT_OF_BOUNDS;
    }

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);
    let fx = x - f64::from(x0);
    let fy = y - f64::from(y0);

    let p00 = image.get_pixel(x0, y0).0;
    let p10 = image.get_pixel(x1, y0).0;
    let p01 = image.get_pixel(x0, y1).0;
    let p11 = image.get_pixel(x1, y1).0;

    let mut out = [0u8; 4];
    for (c, value) in out.iter_mut().enumerate() {
        let top = f64::from(p00[c]) * (1.0 - fx) + f64::from(p10[c]) * fx;
        let bottom = f64::from(p01[c]) * (1.0 - fx) + f64::from(p11[c]) * fx;
        *value = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([220, 20, 30, 255]);
    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

    /// 100x80 white canvas with a red block covering x 20..=79, y 10..=59.
    fn page() -> RgbaImage {
        ImageBuffer::from_fn(100, 80, |x, y| {
            if (20..80).contains(&x) && (10..60).contains(&y) {
                RED
            } else {
                WHITE
            }
        })
    }

    #[test]
    fn exact_quad_extracts_block() {
        let quad = [
            Point::new(20.0, 10.0),
            Point::new(79.0, 10.0),
            Point::new(79.0, 59.0),
            Point::new(20.0, 59.0),
        ];
        let out = warp_perspective(&page(), &quad, 60, 50).expect("warp");
        assert_eq!(out.dimensions(), (60, 50));
        for (x, y) in [(0, 0), (59, 0), (59, 49), (0, 49), (30, 25)] {
            assert_eq!(*out.get_pixel(x, y), RED, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn quad_outside_source_is_black() {
        let quad = [
            Point::new(200.0, 200.0),
            Point::new(260.0, 200.0),
            Point::new(260.0, 240.0),
            Point::new(200.0, 240.0),
        ];
        let out = warp_perspective(&page(), &quad, 16, 8).expect("warp");
        assert!(out.pixels().all(|p| *p == OUT_OF_BOUNDS));
    }

    #[test]
    fn rejects_invalid_input() {
        let tri = [Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(0.0, 1.0)];
        assert_eq!(
            warp_perspective(&page(), &tri, 10, 10),
            Err(WarpError::NotAQuadrilateral(3))
        );

        let quad = [Point::new(0.0, 0.0); 4];
        assert_eq!(
            warp_perspective(&page(), &quad, 0, 10),
            Err(WarpError::EmptyTarget { width: 0, height: 10 })
        );
        assert_eq!(
            warp_perspective(&page(), &quad, 10, 10),
            Err(WarpError::SingularHomography)
        );
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let mut img = RgbaImage::from_pixel(2, 1, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([200, 100, 50, 255]));
        assert_eq!(sample_bilinear(&img, 0.5, 0.0), Rgba([100, 50, 25, 255]));
        assert_eq!(sample_bilinear(&img, 1.0, 0.0), Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn bilinear_out_of_bounds() {
        let img = page();
        assert_eq!(sample_bilinear(&img, -0.1, 5.0), OUT_OF_BOUNDS);
        assert_eq!(sample_bilinear(&img, 5.0, 79.5), OUT_OF_BOUNDS);
        assert_eq!(sample_bilinear(&img, f64::NAN, 1.0), OUT_OF_BOUNDS);
        assert_eq!(sample_bilinear(&RgbaImage::new(0, 0), 0.0, 0.0), OUT_OF_BOUNDS);
    }
}
