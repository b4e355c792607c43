// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Projective transforms — linear solver, homography estimation, and the
// inverse perspective warp built on them.

pub mod homography;
pub mod solver;
pub mod warp;

pub use homography::Homography;
pub use solver::solve_linear_system;
pub use warp::{WarpError, sample_bilinear, warp_perspective};
