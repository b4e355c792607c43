// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line surface — argument parsing, config assembly, and per-file
// rectification.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use image::DynamicImage;
use richtwerk_core::error::Result;
use richtwerk_core::{RectificationMethod, RectifierConfig, RichtwerkError};
use richtwerk_document::{Outcome, Rectifier};
use tracing::{debug, info, instrument, warn};

use crate::data_dir::Locations;

#[derive(Debug, Parser)]
#[command(name = "richtwerk", version, about = "Straighten photographed documents before OCR")]
pub struct Args {
    /// Images to rectify.
    #[arg(required_unless_present = "print_default_config")]
    pub inputs: Vec<PathBuf>,

    /// Directory for `<stem>_rectified.png` outputs.
    #[arg(short, long, default_value = "rectified")]
    pub output_dir: PathBuf,

    /// JSON config file (defaults to `$XDG_CONFIG_HOME/richtwerk/config.json` if present).
    /// Its `enabled` flag is respected; without a file rectification is on.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rectification model (`.rten`).
    #[arg(short, long)]
    pub model: Option<PathBuf>,

    /// How to read the model output.
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Write mask / outline / comparison PNGs here.
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    /// Height of the rectified page in pixels.
    #[arg(long)]
    pub output_height: Option<u32>,

    /// Copy inputs to the output directory without rectifying.
    #[arg(long)]
    pub passthrough: bool,

    /// Print the default configuration as JSON and exit.
    #[arg(long)]
    pub print_default_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    UvdocMask,
    DoctrCorners,
}

impl From<MethodArg> for RectificationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::UvdocMask => Self::UvDocMask,
            MethodArg::DoctrCorners => Self::DocTrCorners,
        }
    }
}

/// Merge the config file (explicit, else the default location) with the
/// command-line overrides.
///
/// Rectification is enabled unless a loaded file says otherwise or
/// `--passthrough` is given.
///
/// Without `--model`, a model missing at the configured path is looked up
/// by filename in the default model directory.
pub fn build_config(args: &Args, locations: &Locations) -> Result<RectifierConfig> {
    let mut config = match args.config.as_deref().or_else(|| locations.existing_config()) {
        Some(path) => {
            info!(path = %path.display(), "Loading configuration");
            RectifierConfig::load(path)?
        }
        None => RectifierConfig {
            enabled: true,
            ..RectifierConfig::default()
        },
    };

    if args.passthrough {
        config.enabled = false;
    }

    if let Some(model) = &args.model {
        config.model_path = model.clone();
    } else if !config.model_path.exists() {
        let relocated = config.clone().with_model_dir(&locations.model_dir);
        if relocated.model_path.is_file() {
            debug!(model = %relocated.model_path.display(), "Using model from data directory");
            config = relocated;
        }
    }
    if let Some(method) = args.method {
        config.method = method.into();
    }
    if let Some(dir) = &args.debug_dir {
        config.debug_dir = Some(dir.clone());
    }
    if let Some(height) = args.output_height {
        config.output_height = height;
    }

    config.validate()?;
    Ok(config)
}

/// `<output_dir>/<stem>_rectified.png`.
pub fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "page".into());
    output_dir.join(format!("{stem}_rectified.png"))
}

/// Rectify one file and write the result.
///
/// When rectification itself fails the original image is still written,
/// and the error is returned so the caller can report it.
#[instrument(skip(rectifier), fields(input = %input.display()))]
pub fn rectify_file(rectifier: &Rectifier, input: &Path, output_dir: &Path) -> Result<(PathBuf, Outcome)> {
    let image = image::open(input)
        .map_err(|e| RichtwerkError::ImageError(format!("cannot read {}: {e}", input.display())))?;
    let output = output_path(input, output_dir);

    match rectifier.apply(image) {
        Ok(done) => {
            save(&done.image, &output)?;
            Ok((output, done.outcome))
        }
        Err(failed) => {
            let (original, error) = failed.into_parts();
            warn!(error = %error, "Writing original image unchanged");
            save(&original, &output)?;
            Err(error)
        }
    }
}

fn save(image: &DynamicImage, path: &Path) -> Result<()> {
    image
        .save(path)
        .map_err(|e| RichtwerkError::ImageError(format!("cannot write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use image::{Rgb, RgbImage};

    fn nowhere() -> Locations {
        Locations::resolve(
            Some(PathBuf::from("/nonexistent/cfg")),
            Some(PathBuf::from("/nonexistent/data")),
            None,
        )
    }

    #[test]
    fn clap_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn overrides_apply() {
        let args = Args::parse_from([
            "richtwerk",
            "a.jpg",
            "--model",
            "/models/doc.rten",
            "--method",
            "doctr-corners",
            "--output-height",
            "640",
            "--debug-dir",
            "/tmp/dbg",
        ]);
        let config = build_config(&args, &nowhere()).unwrap();
        assert!(config.enabled);
        assert_eq!(config.model_path, PathBuf::from("/models/doc.rten"));
        assert_eq!(config.method, RectificationMethod::DocTrCorners);
        assert_eq!(config.output_height, 640);
        assert_eq!(config.debug_dir, Some(PathBuf::from("/tmp/dbg")));
    }

    #[test]
    fn config_file_is_loaded_and_passthrough_disables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"mask_threshold": 0.65, "method": "doctr_corners"}"#).unwrap();

        let args = Args::parse_from(["richtwerk", "a.jpg", "--passthrough", "-c", path.to_str().unwrap()]);
        let config = build_config(&args, &nowhere()).unwrap();
        assert!(!config.enabled);
        assert_eq!(config.mask_threshold, 0.65);
        assert_eq!(config.method, RectificationMethod::DocTrCorners);
    }

    #[test]
    fn config_file_can_disable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"enabled": false}"#).unwrap();

        let args = Args::parse_from(["richtwerk", "a.jpg", "-c", path.to_str().unwrap()]);
        assert!(!build_config(&args, &nowhere()).unwrap().enabled);

        std::fs::write(&path, r#"{"enabled": true, "model_path": "/models/doc.rten"}"#).unwrap();
        assert!(build_config(&args, &nowhere()).unwrap().enabled);
    }

    #[test]
    fn model_found_in_data_dir() {
        let data = tempfile::tempdir().unwrap();
        let locations = Locations::resolve(Some(PathBuf::from("/nonexistent")), Some(data.path().to_path_buf()), None);
        std::fs::create_dir_all(&locations.model_dir).unwrap();
        std::fs::write(locations.model_dir.join("uvdoc.rten"), b"").unwrap();

        let args = Args::parse_from(["richtwerk", "a.jpg"]);
        let config = build_config(&args, &locations).unwrap();
        assert_eq!(config.model_path, locations.model_dir.join("uvdoc.rten"));
    }

    #[test]
    fn invalid_override_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"min_rect_aspect": 9.0}"#).unwrap();
        let args = Args::parse_from(["richtwerk", "a.jpg", "-c", path.to_str().unwrap()]);
        assert!(matches!(
            build_config(&args, &nowhere()),
            Err(RichtwerkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn output_names_follow_stem() {
        assert_eq!(
            output_path(Path::new("/scans/receipt.jpeg"), Path::new("out")),
            PathBuf::from("out/receipt_rectified.png")
        );
        assert_eq!(output_path(Path::new(""), Path::new("out")), PathBuf::from("out/page_rectified.png"));
    }

    #[test]
    fn passthrough_writes_copy() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("scan.png");
        RgbImage::from_pixel(8, 6, Rgb([10, 20, 30])).save(&input).unwrap();

        let rectifier = Rectifier::new(RectifierConfig::default()).unwrap();
        let (output, outcome) = rectify_file(&rectifier, &input, dir.path()).unwrap();
        assert_eq!(outcome, Outcome::Disabled);
        let written = image::open(&output).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (8, 6));
        assert_eq!(*written.get_pixel(3, 3), Rgb([10, 20, 30]));
    }

    #[test]
    fn unreadable_input_is_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let rectifier = Rectifier::new(RectifierConfig::default()).unwrap();
        let err = rectify_file(&rectifier, &dir.path().join("missing.png"), dir.path()).unwrap_err();
        assert!(matches!(err, RichtwerkError::ImageError(_)));
    }
}
