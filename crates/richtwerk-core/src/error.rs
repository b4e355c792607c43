// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Richtwerk.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Richtwerk operations.
///
/// Construction-time variants (`ModelNotFound`, `SessionInit`,
/// `UnexpectedIoShape`, `InvalidConfig`) are fatal: no rectifier is created.
/// Per-call variants (`Normalization`, `Inference`, `UnexpectedOutputShape`)
/// are recoverable — the caller still receives the original image.
#[derive(Debug, Error)]
pub enum RichtwerkError {
    // -- Construction --
    #[error("rectification model not found at {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("inference session initialisation failed: {0}")]
    SessionInit(String),

    #[error("model must expose exactly one input and one output: {0}")]
    UnexpectedIoShape(String),

    #[error("invalid rectifier configuration: {0}")]
    InvalidConfig(String),

    // -- Per-call --
    #[error("input normalisation failed: {0}")]
    Normalization(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("unexpected model output shape: {0}")]
    UnexpectedOutputShape(String),

    #[error("no image supplied to an active rectifier")]
    NilImage,

    // -- Image / persistence --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RichtwerkError {
    /// Whether the error can only occur while building a rectifier.
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::ModelNotFound(_)
                | Self::SessionInit(_)
                | Self::UnexpectedIoShape(_)
                | Self::InvalidConfig(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RichtwerkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_not_found_mentions_path() {
        let err = RichtwerkError::ModelNotFound(PathBuf::from("/models/uvdoc.rten"));
        assert!(err.to_string().contains("/models/uvdoc.rten"));
        assert!(err.is_construction_error());
    }

    #[test]
    fn per_call_errors_are_not_construction_errors() {
        assert!(!RichtwerkError::Inference("boom".into()).is_construction_error());
        assert!(!RichtwerkError::NilImage.is_construction_error());
    }
}
