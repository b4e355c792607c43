// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectifier configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, RichtwerkError};

/// Default output canvas height when `output_height` is zero.
pub const DEFAULT_OUTPUT_HEIGHT: u32 = 1024;

/// How the model output is turned into a document quadrilateral.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RectificationMethod {
    /// Foreground mask (UVDoc-style, mask in channel 2); quadrilateral is the
    /// minimum-area rectangle of the thresholded pixels.
    #[default]
    #[serde(rename = "uvdoc_mask")]
    UvDocMask,
    /// Four regressed corners (DocTR-style) in the first eight output values.
    #[serde(rename = "doctr_corners")]
    DocTrCorners,
}

impl std::fmt::Display for RectificationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UvDocMask => f.write_str("uvdoc_mask"),
            Self::DocTrCorners => f.write_str("doctr_corners"),
        }
    }
}

/// Settings for the document rectifier. Created once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifierConfig {
    /// When false the rectifier never opens a session and passes images through.
    pub enabled: bool,
    /// Path to the rectification model file.
    pub model_path: PathBuf,
    /// Mask probability at or above which a pixel counts as document, in (0, 1].
    pub mask_threshold: f64,
    /// Height of the rectified canvas; zero selects [`DEFAULT_OUTPUT_HEIGHT`].
    pub output_height: u32,
    /// Intra-op thread hint for the inference backend; zero lets it decide.
    pub num_threads: usize,
    /// Minimum fraction of foreground mask pixels, in (0, 1].
    pub min_mask_coverage: f64,
    /// Minimum quadrilateral area relative to the model frame, in (0, 1].
    pub min_rect_area_ratio: f64,
    /// Lower bound on average width / average height.
    pub min_rect_aspect: f64,
    /// Upper bound on average width / average height.
    pub max_rect_aspect: f64,
    /// Directory for mask / outline / comparison PNGs. `None` disables them.
    pub debug_dir: Option<PathBuf>,
    /// Interpretation of the model output.
    pub method: RectificationMethod,
    /// Model input `[width, height]` used when the model declares dynamic
    /// spatial dimensions.
    pub fallback_input_size: [u32; 2],
}

impl Default for RectifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model_path: PathBuf::from("models").join("uvdoc.rten"),
            mask_threshold: 0.5,
            output_height: DEFAULT_OUTPUT_HEIGHT,
            num_threads: 0,
            min_mask_coverage: 0.05,
            min_rect_area_ratio: 0.20,
            min_rect_aspect: 0.2,
            max_rect_aspect: 8.0,
            debug_dir: None,
            method: RectificationMethod::UvDocMask,
            fallback_input_size: [512, 512],
        }
    }
}

impl RectifierConfig {
    /// Check every numeric range. Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        fn unit_interval(name: &str, value: f64) -> Result<()> {
            if value > 0.0 && value <= 1.0 {
                Ok(())
            } else {
                Err(RichtwerkError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {value}"
                )))
            }
        }

        unit_interval("mask_threshold", self.mask_threshold)?;
        unit_interval("min_mask_coverage", self.min_mask_coverage)?;
        unit_interval("min_rect_area_ratio", self.min_rect_area_ratio)?;

        if !(self.min_rect_aspect > 0.0 && self.min_rect_aspect < self.max_rect_aspect) {
            return Err(RichtwerkError::InvalidConfig(format!(
                "aspect bounds must satisfy 0 < min_rect_aspect < max_rect_aspect, got [{}, {}]",
                self.min_rect_aspect, self.max_rect_aspect
            )));
        }
        if self.fallback_input_size.contains(&0) {
            return Err(RichtwerkError::InvalidConfig(format!(
                "fallback_input_size must be non-zero, got {:?}",
                self.fallback_input_size
            )));
        }
        if self.enabled && self.model_path.as_os_str().is_empty() {
            return Err(RichtwerkError::InvalidConfig(
                "model_path is empty but rectification is enabled".into(),
            ));
        }
        Ok(())
    }

    /// The configured output height, substituting the default for zero.
    pub fn effective_output_height(&self) -> u32 {
        if self.output_height == 0 {
            DEFAULT_OUTPUT_HEIGHT
        } else {
            self.output_height
        }
    }

    /// Move the model under `base_dir`, keeping its filename.
    ///
    /// A model path without a filename component is left untouched.
    pub fn relocate_model(&mut self, base_dir: impl AsRef<Path>) {
        if let Some(name) = self.model_path.file_name() {
            self.model_path = base_dir.as_ref().join(name);
        }
    }

    /// Builder-style variant of [`relocate_model`](Self::relocate_model).
    pub fn with_model_dir(mut self, base_dir: impl AsRef<Path>) -> Self {
        self.relocate_model(base_dir);
        self
    }

    /// Read a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
