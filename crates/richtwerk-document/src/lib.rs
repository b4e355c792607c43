// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// richtwerk-document — Geometry and warping engine for Richtwerk.
//
// Provides polygon algorithms (convex hull, minimum-area rectangle,
// Douglas–Peucker, unclip), homography estimation with a dense linear
// solver, inverse perspective warping, and the rectifier that drives them
// from a mask or corner-regression model.

pub mod geometry;
pub mod preprocess;
pub mod rectify;
pub mod transform;

// Re-export the primary entry points so callers can use `richtwerk_document::Rectifier` etc.
pub use geometry::{convex_hull, minimum_area_rectangle, simplify_polygon, unclip_polygon};
pub use rectify::{ApplyError, InferenceSession, Outcome, Rectified, Rectifier, Rejection, TensorDescriptor};
pub use transform::{Homography, WarpError, warp_perspective};

#[cfg(feature = "rten")]
pub use rectify::RtenSession;
