// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// What a rectification call did: the returned image plus the reason it was
// warped or passed through.

use std::fmt;

use image::DynamicImage;
use richtwerk_core::{Point, RichtwerkError};
use thiserror::Error;

use crate::transform::WarpError;

/// Why a frame was passed through instead of warped. None of these are
/// errors: the caller receives the original image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    LowCoverage { coverage: f64, minimum: f64 },
    TooFewForegroundPoints { count: usize, minimum: usize },
    DegenerateCorners { distance: f64, minimum: f64 },
    CollapsedEdges { avg_width: f64, avg_height: f64 },
    AreaTooSmall { ratio: f64, minimum: f64 },
    AspectOutOfRange { aspect: f64, min: f64, max: f64 },
    OutputTooSmall { avg_width: f64, avg_height: f64 },
    Warp(WarpError),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowCoverage { coverage, minimum } => {
                write!(f, "mask coverage {coverage:.3} below {minimum:.3}")
            }
            Self::TooFewForegroundPoints { count, minimum } => {
                write!(f, "{count} foreground points, need {minimum}")
            }
            Self::DegenerateCorners { distance, minimum } => {
                write!(f, "corners {distance:.1}px apart, need {minimum:.1}px")
            }
            Self::CollapsedEdges {
                avg_width,
                avg_height,
            } => write!(f, "average edges {avg_width:.2}x{avg_height:.2} have collapsed"),
            Self::AreaTooSmall { ratio, minimum } => {
                write!(f, "quadrilateral covers {ratio:.3} of the frame, need {minimum:.3}")
            }
            Self::AspectOutOfRange { aspect, min, max } => {
                write!(f, "aspect ratio {aspect:.3} outside [{min}, {max}]")
            }
            Self::OutputTooSmall {
                avg_width,
                avg_height,
            } => write!(f, "rescaled edges {avg_width:.2}x{avg_height:.2} too small to warp"),
            Self::Warp(err) => write!(f, "warp failed: {err}"),
        }
    }
}

impl From<WarpError> for Rejection {
    fn from(err: WarpError) -> Self {
        Self::Warp(err)
    }
}

/// How the returned image was produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Rectification is disabled or the session has been closed.
    Disabled,
    /// A gate rejected the frame; the image is the original.
    Rejected(Rejection),
    /// The image is the warp of `quad` (source-image coordinates, ordered
    /// top-left, top-right, bottom-right, bottom-left).
    Warped { quad: [Point; 4], width: u32, height: u32 },
}

impl Outcome {
    pub fn is_warped(&self) -> bool {
        matches!(self, Self::Warped { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("rectification disabled"),
            Self::Rejected(reason) => write!(f, "kept original ({reason})"),
            Self::Warped { width, height, .. } => write!(f, "rectified to {width}x{height}"),
        }
    }
}

/// Result of a successful [`Rectifier::apply`](super::Rectifier::apply).
#[derive(Debug, Clone)]
pub struct Rectified {
    pub image: DynamicImage,
    pub outcome: Outcome,
}

impl Rectified {
    pub(crate) fn unchanged(image: DynamicImage, outcome: Outcome) -> Self {
        Self { image, outcome }
    }
}

/// A per-call failure. Carries the untouched input so callers that only
/// want "best effort" can keep going with it.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct ApplyError {
    pub image: DynamicImage,
    #[source]
    pub error: RichtwerkError,
}

impl ApplyError {
    /// Split into the original image and the underlying error.
    pub fn into_parts(self) -> (DynamicImage, RichtwerkError) {
        (self.image, self.error)
    }
}

impl From<ApplyError> for RichtwerkError {
    fn from(err: ApplyError) -> Self {
        err.error
    }
}
