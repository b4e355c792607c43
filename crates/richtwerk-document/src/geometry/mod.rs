// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry module — convex hull, minimum-area rectangle, polygon
// simplification, unclip, and corner ordering.

pub mod hull;
pub mod min_rect;
pub mod polygon;

pub use hull::convex_hull;
pub use min_rect::minimum_area_rectangle;
pub use polygon::{
    centroid, order_corners, perpendicular_distance, polygon_area, simplify_polygon,
    unclip_polygon,
};
