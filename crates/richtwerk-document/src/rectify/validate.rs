// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plausibility gates for candidate quadrilaterals and canonical output sizing.

use richtwerk_core::{Point, RectifierConfig};

use super::outcome::Rejection;
use crate::geometry::polygon_area;

/// Minimum distance between any two corners, as a fraction of frame width.
pub const MIN_CORNER_DISTANCE_RATIO: f64 = 0.05;

/// Output dimensions are floored to a multiple of this (never below it).
pub const OUTPUT_ALIGNMENT: u32 = 32;

/// Width and height of the model frame the quadrilateral was found in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Mean lengths of the opposing edge pairs of an ordered quadrilateral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLengths {
    pub avg_width: f64,
    pub avg_height: f64,
}

impl EdgeLengths {
    pub fn aspect(&self) -> f64 {
        self.avg_width / self.avg_height
    }
}

/// Average top/bottom and left/right edges of `quad` (TL, TR, BR, BL).
pub fn edge_lengths(quad: &[Point; 4]) -> EdgeLengths {
    let [tl, tr, br, bl] = *quad;
    EdgeLengths {
        avg_width: (tl.distance(tr) + bl.distance(br)) / 2.0,
        avg_height: (tl.distance(bl) + tr.distance(br)) / 2.0,
    }
}

/// Smallest distance between any pair of corners.
pub fn min_corner_distance(quad: &[Point; 4]) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..4 {
        for j in (i + 1)..4 {
            min = min.min(quad[i].distance(quad[j]));
        }
    }
    min
}

/// Run every geometric gate, in order: corner separation, collapsed edges,
/// area ratio, aspect ratio. The first failure wins.
pub fn check_quadrilateral(
    quad: &[Point; 4],
    frame: Frame,
    config: &RectifierConfig,
) -> Result<EdgeLengths, Rejection> {
    let distance = min_corner_distance(quad);
    let minimum = frame.width * MIN_CORNER_DISTANCE_RATIO;
    if distance < minimum {
        return Err(Rejection::DegenerateCorners { distance, minimum });
    }

    let edges = edge_lengths(quad);
    if edges.avg_width <= 1.0 || edges.avg_height <= 1.0 {
        return Err(Rejection::CollapsedEdges {
            avg_width: edges.avg_width,
            avg_height: edges.avg_height,
        });
    }

    let ratio = polygon_area(quad).abs() / frame.area();
    if ratio < config.min_rect_area_ratio {
        return Err(Rejection::AreaTooSmall {
            ratio,
            minimum: config.min_rect_area_ratio,
        });
    }

    let aspect = edges.aspect();
    if aspect < config.min_rect_aspect || aspect > config.max_rect_aspect {
        return Err(Rejection::AspectOutOfRange {
            aspect,
            min: config.min_rect_aspect,
            max: config.max_rect_aspect,
        });
    }

    Ok(edges)
}

/// Floor to a multiple of [`OUTPUT_ALIGNMENT`], with the alignment itself
/// as the minimum.
pub fn align_down(value: u32) -> u32 {
    (value / OUTPUT_ALIGNMENT * OUTPUT_ALIGNMENT).max(OUTPUT_ALIGNMENT)
}

/// Canonical `(width, height)` of the rectified page for a source-space quad.
///
/// Height is `output_height`; width follows the quad's average aspect ratio.
/// Returns `None` when either average edge is one pixel or less.
pub fn output_size(quad: &[Point; 4], output_height: u32) -> Option<(u32, u32)> {
    let edges = edge_lengths(quad);
    if edges.avg_width <= 1.0 || edges.avg_height <= 1.0 {
        return None;
    }
    let width = (edges.aspect() * f64::from(output_height)).round();
    let width = if width >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        width as u32
    };
    Some((align_down(width), align_down(output_height)))
}
