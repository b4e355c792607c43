// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core geometric value types shared across the Richtwerk crates.

use serde::{Deserialize, Serialize};

/// A planar coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Multiply each axis independently.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self::new(self.x * sx, self.y * sy)
    }

    /// Translate by `(dx, dy)`.
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Axis-aligned bounds. Always satisfies `min_x <= max_x` and `min_y <= max_y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Build a box from two opposite corners given in any order.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Tightest box around `points`, or `None` for an empty slice.
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Self::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            bounds.min_x = bounds.min_x.min(p.x);
            bounds.min_y = bounds.min_y.min(p.y);
            bounds.max_x = bounds.max_x.max(p.x);
            bounds.max_y = bounds.max_y.max(p.y);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Whether `point` lies inside the box grown by `tolerance` on every side.
    pub fn contains(&self, point: Point, tolerance: f64) -> bool {
        point.x >= self.min_x - tolerance
            && point.x <= self.max_x + tolerance
            && point.y >= self.min_y - tolerance
            && point.y <= self.max_y + tolerance
    }

    /// Scale both corners about the origin. Negative factors keep the ordering
    /// invariant because the box is rebuilt through [`BoundingBox::new`].
    pub fn scale(&self, sx: f64, sy: f64) -> Self {
        Self::new(
            self.min_x * sx,
            self.min_y * sy,
            self.max_x * sx,
            self.max_y * sy,
        )
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            min_x: self.min_x + dx,
            min_y: self.min_y + dy,
            max_x: self.max_x + dx,
            max_y: self.max_y + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_orders_corners() {
        let b = BoundingBox::new(10.0, 8.0, 2.0, 4.0);
        assert_eq!(b.min_x, 2.0);
        assert_eq!(b.min_y, 4.0);
        assert_eq!(b.max_x, 10.0);
        assert_eq!(b.max_y, 8.0);
        assert_eq!(b.area(), 32.0);
    }

    #[test]
    fn bounding_box_from_points() {
        let pts = [
            Point::new(3.0, 1.0),
            Point::new(-1.0, 5.0),
            Point::new(2.0, -2.0),
        ];
        let b = BoundingBox::from_points(&pts).expect("non-empty");
        assert_eq!(b, BoundingBox::new(-1.0, -2.0, 3.0, 5.0));
        assert!(BoundingBox::from_points(&[]).is_none());
    }

    #[test]
    fn negative_scale_keeps_invariant() {
        let b = BoundingBox::new(1.0, 1.0, 3.0, 2.0).scale(-2.0, 1.0);
        assert!(b.min_x <= b.max_x);
        assert_eq!(b.width(), 4.0);
    }

    #[test]
    fn contains_respects_tolerance() {
        let b = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(b.contains(Point::new(10.5, 5.0), 1.0));
        assert!(!b.contains(Point::new(12.0, 5.0), 1.0));
    }

    #[test]
    fn point_helpers() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.distance(Point::default()), 5.0);
        assert_eq!(p.scale(2.0, 0.5), Point::new(6.0, 2.0));
        assert_eq!(p.offset(-3.0, 1.0), Point::new(0.0, 5.0));
    }
}
