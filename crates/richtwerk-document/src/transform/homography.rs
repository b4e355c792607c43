// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Planar homography — estimation from four point correspondences and
// application to individual points.

use richtwerk_core::Point;

use super::solver::solve_linear_system;

/// Coordinate returned for points whose projective denominator is exactly
/// zero. Far outside any real image, so samplers treat it as off-canvas.
pub const OFF_CANVAS: f64 = 1.0e12;

/// A 3x3 projective transform stored row-major as `h[0..9]`, with `h[8] = 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Homography(pub [f64; 9]);

impl Homography {
    pub const IDENTITY: Self = Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    /// Estimate the homography mapping each `src[i]` onto `dst[i]`.
    ///
    /// Each correspondence contributes two rows of an 8x8 system in
    /// `h0..h7`, obtained by clearing the denominator of
    /// `x' = (h0 X + h1 Y + h2) / (h6 X + h7 Y + 1)` and the matching `y'`.
    /// Returns `None` for collinear or duplicated correspondences.
    pub fn from_correspondences(src: &[Point; 4], dst: &[Point; 4]) -> Option<Self> {
        let mut a = [[0.0; 8]; 8];
        let mut b = [0.0; 8];

        for (i, (p, q)) in src.iter().zip(dst).enumerate() {
            let (x, y) = (p.x, p.y);
            a[2 * i] = [x, y, 1.0, 0.0, 0.0, 0.0, -x * q.x, -y * q.x];
            b[2 * i] = q.x;
            a[2 * i + 1] = [0.0, 0.0, 0.0, x, y, 1.0, -x * q.y, -y * q.y];
            b[2 * i + 1] = q.y;
        }

        let h = solve_linear_system(a, b)?;
        Some(Self([h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0]))
    }

    pub fn coefficients(&self) -> &[f64; 9] {
        &self.0
    }

    /// Map `p` through the transform.
    ///
    /// A zero denominator yields `(OFF_CANVAS, OFF_CANVAS)` instead of
    /// dividing by zero.
    pub fn apply(&self, p: Point) -> Point {
        let h = &self.0;
        let denom = h[6] * p.x + h[7] * p.y + h[8];
        if denom == 0.0 {
            return Point::new(OFF_CANVAS, OFF_CANVAS);
        }
        Point::new(
            (h[0] * p.x + h[1] * p.y + h[2]) / denom,
            (h[3] * p.x + h[4] * p.y + h[5]) / denom,
        )
    }
}

impl Default for Homography {
    fn default() -> Self {
        Self::IDENTITY
    }
}
