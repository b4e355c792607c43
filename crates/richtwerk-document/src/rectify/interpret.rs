// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Model output interpretation — foreground mask to quadrilateral (UVDoc
// style) and direct corner regression (DocTR style).

use richtwerk_core::error::Result;
use richtwerk_core::{Point, RichtwerkError};
use rten_tensor::Tensor;
use rten_tensor::prelude::*;
use tracing::debug;

use super::outcome::Rejection;
use crate::geometry::{minimum_area_rectangle, order_corners};

/// Channel of a UVDoc-style output that holds the document mask.
pub const MASK_CHANNEL: usize = 2;

/// Fewest foreground pixels worth fitting a rectangle to.
pub const MIN_FOREGROUND_POINTS: usize = 100;

/// Number of scalars a corner-regression output must provide.
pub const CORNER_VALUES: usize = 8;

/// A single-channel probability map in model-output coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskPlane {
    width: usize,
    height: usize,
    values: Vec<f32>,
}

impl MaskPlane {
    /// Build a plane directly from row-major values.
    pub fn new(width: usize, height: usize, values: Vec<f32>) -> Result<Self> {
        if values.len() != width * height {
            return Err(RichtwerkError::UnexpectedOutputShape(format!(
                "mask of {width}x{height} needs {} values, got {}",
                width * height,
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Extract [`MASK_CHANNEL`] of the first batch item of an NCHW tensor.
    ///
    /// The tensor must be rank 4 with at least three channels.
    pub fn from_output(output: &Tensor<f32>) -> Result<Self> {
        let &[_, channels, height, width] = output.shape() else {
            return Err(RichtwerkError::UnexpectedOutputShape(format!(
                "mask output must be rank 4, got shape {:?}",
                output.shape()
            )));
        };
        if channels <= MASK_CHANNEL {
            return Err(RichtwerkError::UnexpectedOutputShape(format!(
                "mask output needs at least {} channels, got {channels}",
                MASK_CHANNEL + 1
            )));
        }
        if width == 0 || height == 0 {
            return Err(RichtwerkError::UnexpectedOutputShape(format!(
                "mask output has empty plane {width}x{height}"
            )));
        }

        let plane = width * height;
        let values: Vec<f32> = output
            .iter()
            .skip(MASK_CHANNEL * plane)
            .take(plane)
            .copied()
            .collect();
        Self::new(width, height, values)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn value(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.width + x]
    }

    /// Pixel centres whose probability is at least `threshold`.
    pub fn foreground(&self, threshold: f64) -> Vec<Point> {
        self.values
            .iter()
            .enumerate()
            .filter(|&(_, v)| f64::from(*v) >= threshold)
            .map(|(i, _)| Point::new((i % self.width) as f64, (i / self.width) as f64))
            .collect()
    }
}

/// Threshold the mask and fit a minimum-area rectangle to the foreground.
///
/// Coverage below `min_coverage`, or fewer than [`MIN_FOREGROUND_POINTS`]
/// foreground pixels, rejects the frame. The corners come back ordered
/// top-left, top-right, bottom-right, bottom-left.
pub fn quad_from_mask(
    mask: &MaskPlane,
    threshold: f64,
    min_coverage: f64,
) -> std::result::Result<[Point; 4], Rejection> {
    let points = mask.foreground(threshold);
    let coverage = points.len() as f64 / (mask.width * mask.height) as f64;
    debug!(foreground = points.len(), coverage, "Mask thresholded");

    if coverage < min_coverage {
        return Err(Rejection::LowCoverage {
            coverage,
            minimum: min_coverage,
        });
    }
    if points.len() < MIN_FOREGROUND_POINTS {
        return Err(Rejection::TooFewForegroundPoints {
            count: points.len(),
            minimum: MIN_FOREGROUND_POINTS,
        });
    }

    Ok(order_corners(minimum_area_rectangle(&points)))
}

/// Read four `(x, y)` corners from the first eight output values.
///
/// If any pair lies in `[0, 1]` on both axes the whole set is treated as
/// normalised and scaled to the frame. Every coordinate is then clamped into
/// `[0, width-1] x [0, height-1]`.
pub fn quad_from_corners(values: &[f32], width: u32, height: u32) -> Result<[Point; 4]> {
    let Some(values) = values.get(..CORNER_VALUES) else {
        return Err(RichtwerkError::UnexpectedOutputShape(format!(
            "corner output needs {CORNER_VALUES} values, got {}",
            values.len()
        )));
    };

    let mut corners = [Point::default(); 4];
    for (corner, pair) in corners.iter_mut().zip(values.chunks_exact(2)) {
        *corner = Point::new(f64::from(pair[0]), f64::from(pair[1]));
    }

    let unit = |v: f64| (0.0..=1.0).contains(&v);
    let normalized = corners.iter().any(|p| unit(p.x) && unit(p.y));
    let (w, h) = (f64::from(width), f64::from(height));
    if normalized {
        corners = corners.map(|p| p.scale(w, h));
    }

    let (max_x, max_y) = ((w - 1.0).max(0.0), (h - 1.0).max(0.0));
    let corners = corners.map(|p| Point::new(p.x.clamp(0.0, max_x), p.y.clamp(0.0, max_y)));
    debug!(normalized, corners = ?corners, "Corner output decoded");

    Ok(order_corners(corners))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 64x64 mask with a solid block over x, y in 15..49.
    fn block_mask() -> MaskPlane {
        let values = (0..64 * 64)
            .map(|i| {
                let (x, y) = (i % 64, i / 64);
                if (15..49).contains(&x) && (15..49).contains(&y) {
                    0.9
                } else {
                    0.1
                }
            })
            .collect();
        MaskPlane::new(64, 64, values).unwrap()
    }

    #[test]
    fn block_mask_yields_square() {
        let mask = block_mask();
        assert_eq!(mask.foreground(0.5).len(), 34 * 34);

        let quad = quad_from_mask(&mask, 0.5, 0.05).expect("accepted");
        let [tl, tr, br, bl] = quad;
        assert!((tl.x - 15.0).abs() < 1e-6 && (tl.y - 15.0).abs() < 1e-6, "{tl}");
        assert!((br.x - 48.0).abs() < 1e-6 && (br.y - 48.0).abs() < 1e-6, "{br}");
        assert!(tr.x > tl.x && bl.y > tl.y);
    }

    #[test]
    fn sparse_mask_is_low_coverage() {
        let mut values = vec![0.0; 64 * 64];
        values[..50].fill(1.0);
        let mask = MaskPlane::new(64, 64, values).unwrap();
        assert!(matches!(
            quad_from_mask(&mask, 0.5, 0.05),
            Err(Rejection::LowCoverage { .. })
        ));
    }

    #[test]
    fn tiny_mask_has_too_few_points() {
        // 90 of 100 pixels lit: high coverage, still under the point floor.
        let values = (0..100).map(|i| if i < 90 { 1.0 } else { 0.0 }).collect();
        let mask = MaskPlane::new(10, 10, values).unwrap();
        assert!(matches!(
            quad_from_mask(&mask, 0.5, 0.05),
            Err(Rejection::TooFewForegroundPoints { count: 90, .. })
        ));
    }

    #[test]
    fn mask_reads_channel_two() {
        let plane = 4 * 3;
        let mut data = vec![0.0f32; 3 * plane];
        data[2 * plane + 5] = 0.75;
        let output = Tensor::from_data(&[1, 3, 3, 4], data);
        let mask = MaskPlane::from_output(&output).unwrap();
        assert_eq!((mask.width(), mask.height()), (4, 3));
        assert_eq!(mask.value(1, 1), 0.75);
    }

    #[test]
    fn mask_shape_errors() {
        let flat = Tensor::from_data(&[16], vec![0.0f32; 16]);
        assert!(matches!(
            MaskPlane::from_output(&flat),
            Err(RichtwerkError::UnexpectedOutputShape(_))
        ));
        let two_channels = Tensor::from_data(&[1, 2, 2, 2], vec![0.0f32; 8]);
        assert!(matches!(
            MaskPlane::from_output(&two_channels),
            Err(RichtwerkError::UnexpectedOutputShape(_))
        ));
        assert!(MaskPlane::new(3, 3, vec![0.0; 8]).is_err());
    }

    #[test]
    fn normalized_corners_are_scaled_and_ordered() {
        // Given clockwise from bottom-right.
        let values = [0.9, 0.8, 0.1, 0.8, 0.1, 0.2, 0.9, 0.2];
        let quad = quad_from_corners(&values, 100, 50).unwrap();
        let expected = [
            Point::new(10.0, 10.0),
            Point::new(90.0, 10.0),
            Point::new(90.0, 40.0),
            Point::new(10.0, 40.0),
        ];
        for (got, want) in quad.iter().zip(expected) {
            assert!((got.x - want.x).abs() < 1e-4 && (got.y - want.y).abs() < 1e-4, "{got} vs {want}");
        }
    }

    #[test]
    fn pixel_corners_are_clamped() {
        let values = [-5.0, 3.0, 120.0, 2.0, 130.0, 70.0, 4.0, 65.0, 99.0];
        let quad = quad_from_corners(&values, 100, 60).unwrap();
        assert_eq!(quad[0], Point::new(0.0, 3.0));
        assert_eq!(quad[1], Point::new(99.0, 2.0));
        assert_eq!(quad[2], Point::new(99.0, 59.0));
        assert_eq!(quad[3], Point::new(4.0, 59.0));
    }

    #[test]
    fn too_few_corner_values() {
        assert!(matches!(
            quad_from_corners(&[0.0; 7], 10, 10),
            Err(RichtwerkError::UnexpectedOutputShape(_))
        ));
    }
}
