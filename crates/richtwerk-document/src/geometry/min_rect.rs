// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Minimum-area enclosing rectangle via rotating calipers over hull edges.

use richtwerk_core::Point;

use super::hull::convex_hull;

/// Half-thickness given to rectangles synthesised around a segment.
const THIN_HALF_WIDTH: f64 = 0.5;

/// Best candidate found so far: an orthonormal basis and the extents of the
/// hull expressed in it.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    u: Point,
    v: Point,
    min_s: f64,
    max_s: f64,
    min_t: f64,
    max_t: f64,
}

impl Candidate {
    fn area(&self) -> f64 {
        (self.max_s - self.min_s) * (self.max_t - self.min_t)
    }

    /// World-space corners, wound consistently with the `(u, v)` basis.
    fn corners(&self) -> [Point; 4] {
        let at = |s: f64, t: f64| Point::new(self.u.x * s + self.v.x * t, self.u.y * s + self.v.y * t);
        [
            at(self.min_s, self.min_t),
            at(self.max_s, self.min_t),
            at(self.max_s, self.max_t),
            at(self.min_s, self.max_t),
        ]
    }
}

/// Minimum-area rectangle enclosing `points`.
///
/// Always yields four corners. An empty input or a single distinct point
/// gives a 1x1 square anchored at that point (the origin when empty); two
/// distinct hull points give a thin rectangle along the segment. Otherwise
/// every hull edge is tried as a rectangle side and the smallest result wins,
/// so the area never exceeds that of the axis-aligned bounding box.
pub fn minimum_area_rectangle(points: &[Point]) -> [Point; 4] {
    let hull = convex_hull(points);
    let mut distinct = hull.clone();
    distinct.dedup();

    match distinct.as_slice() {
        [] => unit_square(Point::default()),
        [p] => unit_square(*p),
        [a, b] => thin_rectangle(*a, *b),
        _ => rotating_calipers(&hull),
    }
}

fn unit_square(anchor: Point) -> [Point; 4] {
    [
        anchor,
        anchor.offset(1.0, 0.0),
        anchor.offset(1.0, 1.0),
        anchor.offset(0.0, 1.0),
    ]
}

fn thin_rectangle(a: Point, b: Point) -> [Point; 4] {
    let length = a.distance(b);
    let (nx, ny) = ((b.y - a.y) / length, -(b.x - a.x) / length);
    let (ox, oy) = (nx * THIN_HALF_WIDTH, ny * THIN_HALF_WIDTH);
    [
        a.offset(-ox, -oy),
        b.offset(-ox, -oy),
        b.offset(ox, oy),
        a.offset(ox, oy),
    ]
}

fn rotating_calipers(hull: &[Point]) -> [Point; 4] {
    let n = hull.len();
    let mut best: Option<Candidate> = None;

    for i in 0..n {
        let a = hull[i];
        let b = hull[(i + 1) % n];
        let length = a.distance(b);
        if length <= f64::EPSILON {
            continue;
        }

        let u = Point::new((b.x - a.x) / length, (b.y - a.y) / length);
        let v = Point::new(-u.y, u.x);

        let mut candidate = Candidate {
            u,
            v,
            min_s: f64::INFINITY,
            max_s: f64::NEG_INFINITY,
            min_t: f64::INFINITY,
            max_t: f64::NEG_INFINITY,
        };
        for p in hull {
            let s = p.x * u.x + p.y * u.y;
            let t = p.x * v.x + p.y * v.y;
            candidate.min_s = candidate.min_s.min(s);
            candidate.max_s = candidate.max_s.max(s);
            candidate.min_t = candidate.min_t.min(t);
            candidate.max_t = candidate.max_t.max(t);
        }

        if best.is_none_or(|current| candidate.area() < current.area()) {
            best = Some(candidate);
        }
    }

    match best {
        Some(candidate) => candidate.corners(),
        None => unit_square(hull[0]),
    }
}
