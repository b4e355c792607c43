// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Convex hull via Andrew's monotone chain.

use richtwerk_core::Point;

/// Z component of `(a - o) x (b - o)`. Positive for a strict left turn.
pub(crate) fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Convex hull of an arbitrary point set.
///
/// Returns the hull vertices in strict counter-clockwise order (y-up frame),
/// without duplicates and without repeating the first vertex at the end.
/// Collinear boundary points are dropped. Inputs with fewer than two distinct
/// points are returned unchanged.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup();

    if sorted.len() < 2 {
        return points.to_vec();
    }

    let mut lower: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Point> = Vec::with_capacity(sorted.len());
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    // The last point of each chain is the first point of the other.
    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon::polygon_area;

    fn scattered() -> Vec<Point> {
        // Deterministic pseudo-random cloud inside a 100x60 box.
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % 10_000) as f64 / 100.0
        };
        (0..200).map(|_| Point::new(next(), next() * 0.6)).collect()
    }

    #[test]
    fn square_with_interior_and_duplicates() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
            Point::new(2.0, 2.0),
            Point::new(4.0, 4.0),
            Point::new(2.0, 0.0),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(
            hull,
            vec![
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 4.0),
                Point::new(0.0, 4.0),
            ]
        );
    }

    #[test]
    fn hull_is_ccw_and_no_larger_than_input() {
        let pts = scattered();
        let hull = convex_hull(&pts);
        assert!(hull.len() >= 3);
        assert!(hull.len() <= pts.len());
        assert!(polygon_area(&hull) > 0.0);
        assert_ne!(hull.first(), hull.last());
    }

    #[test]
    fn hull_is_idempotent() {
        let hull = convex_hull(&scattered());
        let again = convex_hull(&hull);
        assert_eq!(again.len(), hull.len());
    }

    #[test]
    fn every_hull_turn_is_strictly_left() {
        let hull = convex_hull(&scattered());
        let n = hull.len();
        for i in 0..n {
            assert!(cross(hull[i], hull[(i + 1) % n], hull[(i + 2) % n]) > 0.0);
        }
    }

    #[test]
    fn degenerate_inputs_pass_through() {
        assert!(convex_hull(&[]).is_empty());
        let single = [Point::new(3.0, 3.0)];
        assert_eq!(convex_hull(&single), single.to_vec());
        let repeated = [Point::new(1.0, 1.0); 3];
        assert_eq!(convex_hull(&repeated), repeated.to_vec());
    }

    #[test]
    fn collinear_points_reduce_to_endpoints() {
        let pts: Vec<Point> = (0..5).map(|i| Point::new(i as f64, i as f64)).collect();
        assert_eq!(
            convex_hull(&pts),
            vec![Point::new(0.0, 0.0), Point::new(4.0, 4.0)]
        );
    }
}
