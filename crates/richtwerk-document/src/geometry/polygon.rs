// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polygon utilities — Douglas–Peucker simplification, centroid-relative
// unclip, shoelace area, and corner ordering for document quadrilaterals.

use richtwerk_core::Point;

/// Simplify an open or closed curve with the Douglas–Peucker algorithm.
///
/// Sequences of three points or fewer, and non-positive tolerances, are
/// returned as an unmodified copy. The first and last points are always kept.
pub fn simplify_polygon(points: &[Point], epsilon: f64) -> Vec<Point> {
    if points.len() <= 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;
    mark_significant(points, 0, last, epsilon, &mut keep);

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(*p))
        .collect()
}

/// Flag the farthest point between `start` and `end` if it deviates by more
/// than `epsilon`, then recurse into both halves.
fn mark_significant(points: &[Point], start: usize, end: usize, epsilon: f64, keep: &mut [bool]) {
    if end <= start + 1 {
        return;
    }

    let mut max_dist = 0.0;
    let mut max_index = start;
    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        let dist = perpendicular_distance(*p, points[start], points[end]);
        if dist > max_dist {
            max_dist = dist;
            max_index = i;
        }
    }

    if max_dist > epsilon {
        keep[max_index] = true;
        mark_significant(points, start, max_index, epsilon, keep);
        mark_significant(points, max_index, end, epsilon, keep);
    }
}

/// Distance from `point` to the infinite line through `a` and `b`.
///
/// A zero-length segment falls back to the Euclidean distance to `a`.
pub fn perpendicular_distance(point: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let length = dx.hypot(dy);
    if length == 0.0 {
        return point.distance(a);
    }
    ((point.x - a.x) * dy - (point.y - a.y) * dx).abs() / length
}

/// Scale every point's offset from the centroid by `scale`.
///
/// `scale > 1` expands the polygon, `scale < 1` shrinks it. Point count and
/// order are preserved. A scale of exactly 1.0 or an empty input is a copy.
pub fn unclip_polygon(points: &[Point], scale: f64) -> Vec<Point> {
    if scale == 1.0 || points.is_empty() {
        return points.to_vec();
    }

    let centroid = centroid(points);
    points
        .iter()
        .map(|p| {
            Point::new(
                centroid.x + (p.x - centroid.x) * scale,
                centroid.y + (p.y - centroid.y) * scale,
            )
        })
        .collect()
}

/// Arithmetic mean of the points. The origin for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Signed shoelace area. Positive when the vertices run counter-clockwise in
/// a y-up frame (clockwise on screen, where y points down).
pub fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x * b.y - b.x * a.y;
    }
    twice_area / 2.0
}

/// Order four corners as top-left, top-right, bottom-right, bottom-left in
/// image coordinates (y down).
///
/// Corners are sorted by angle around their centroid, which yields a
/// consistent on-screen clockwise winding for any convex quadrilateral, and
/// the sequence is then rotated to start at the corner with the smallest
/// `x + y`.
pub fn order_corners(corners: [Point; 4]) -> [Point; 4] {
    let center = centroid(&corners);
    let mut sorted = corners;
    sorted.sort_by(|a, b| {
        let angle_a = (a.y - center.y).atan2(a.x - center.x);
        let angle_b = (b.y - center.y).atan2(b.x - center.x);
        angle_a.total_cmp(&angle_b)
    });

    let start = sorted
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (a.x + a.y).total_cmp(&(b.x + b.y)))
        .map(|(i, _)| i)
        .unwrap_or(0);
    sorted.rotate_left(start);
    sorted
}
