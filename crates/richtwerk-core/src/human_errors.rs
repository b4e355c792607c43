// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for command-line and UI front-ends.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::RichtwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Retrying the same call may succeed.
    Transient,
    /// User must do something (fix a path, download a model, edit the config).
    ActionRequired,
    /// Retrying will not help — the model or input is unusable.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether the original image is still usable as-is.
    pub original_kept: bool,
    pub severity: Severity,
}

/// Convert a `RichtwerkError` into a `HumanError`.
pub fn humanize_error(err: &RichtwerkError) -> HumanError {
    match err {
        RichtwerkError::ModelNotFound(path) => HumanError {
            message: "The rectification model file is missing.".into(),
            suggestion: format!(
                "Download the model to {} or point `model_path` at an existing file.",
                path.display()
            ),
            original_kept: false,
            severity: Severity::ActionRequired,
        },

        RichtwerkError::SessionInit(detail) => HumanError {
            message: "The rectification model could not be loaded.".into(),
            suggestion: format!(
                "The file may be damaged or in the wrong format. Re-download it and try again. ({detail})"
            ),
            original_kept: false,
            severity: Severity::Permanent,
        },

        RichtwerkError::UnexpectedIoShape(_) => HumanError {
            message: "This model isn't a document rectification model.".into(),
            suggestion: "Use a model with exactly one image input and one output.".into(),
            original_kept: false,
            severity: Severity::Permanent,
        },

        RichtwerkError::InvalidConfig(detail) => HumanError {
            message: "The rectifier settings are invalid.".into(),
            suggestion: format!("Fix the configuration and try again. ({detail})"),
            original_kept: false,
            severity: Severity::ActionRequired,
        },

        RichtwerkError::Normalization(_) | RichtwerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be empty or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            original_kept: true,
            severity: Severity::Permanent,
        },

        RichtwerkError::Inference(_) => HumanError {
            message: "Document straightening failed for this image.".into(),
            suggestion: "Try again. If it keeps happening, check the model file.".into(),
            original_kept: true,
            severity: Severity::Transient,
        },

        RichtwerkError::UnexpectedOutputShape(_) => HumanError {
            message: "The model produced output in an unexpected format.".into(),
            suggestion: "Check that `method` matches the model (mask models use uvdoc_mask, corner models use doctr_corners).".into(),
            original_kept: true,
            severity: Severity::ActionRequired,
        },

        RichtwerkError::NilImage => HumanError {
            message: "No image was given.".into(),
            suggestion: "Pass an image to straighten.".into(),
            original_kept: false,
            severity: Severity::ActionRequired,
        },

        RichtwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    original_kept: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied while reading or writing a file.".into(),
                    suggestion: "Check the file and directory permissions.".into(),
                    original_kept: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    original_kept: false,
                    severity: Severity::Transient,
                }
            }
        }

        RichtwerkError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Check that it is valid JSON. `richtwerk --print-default-config` shows a working example.".into(),
            original_kept: false,
            severity: Severity::ActionRequired,
        },
    }
}
