// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectification orchestrator — owns the configuration and inference session
// and sequences normalisation, inference, interpretation, validation,
// rescaling and warping for each image.

use std::sync::{Mutex, PoisonError};

use image::{DynamicImage, RgbaImage};
use richtwerk_core::error::Result;
use richtwerk_core::{Point, RectificationMethod, RectifierConfig, RichtwerkError};
use rten_tensor::prelude::*;
use tracing::{debug, info, instrument, warn};

use super::debug::{DebugArtifacts, next_stamp};
use super::inference::{InferenceSession, TensorDescriptor};
use super::interpret::{MaskPlane, quad_from_corners, quad_from_mask};
use super::outcome::{ApplyError, Outcome, Rectified, Rejection};
use super::validate::{Frame, check_quadrilateral, edge_lengths, output_size};
use crate::preprocess::normalize_to_tensor;
use crate::transform::warp_perspective;

/// Input/output contract of the open model, resolved once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelIo {
    pub input: TensorDescriptor,
    pub output: TensorDescriptor,
    pub input_width: u32,
    pub input_height: u32,
}

impl ModelIo {
    fn resolve(session: &dyn InferenceSession, config: &RectifierConfig) -> Result<Self> {
        let input = session.input().clone();
        let output = session.output().clone();

        if input.rank() != 4 {
            return Err(RichtwerkError::UnexpectedIoShape(format!(
                "input {input} must be rank 4 (N, C, H, W)"
            )));
        }
        if input.channels().is_some_and(|c| c != 3) {
            return Err(RichtwerkError::UnexpectedIoShape(format!(
                "input {input} must take 3 colour channels"
            )));
        }

        let (input_width, input_height) = input.spatial_size().unwrap_or_else(|| {
            let [w, h] = config.fallback_input_size;
            debug!(width = w, height = h, "Model input size is dynamic; using fallback");
            (w, h)
        });

        Ok(Self {
            input,
            output,
            input_width,
            input_height,
        })
    }
}

/// Internal result of one pipeline run. Every rejection funnels through
/// [`reject`] so pass-through has a single exit.
enum Stage {
    Inactive,
    Rejected(Rejection),
    Warped {
        image: RgbaImage,
        quad: [Point; 4],
        width: u32,
        height: u32,
    },
}

fn reject(rejection: Rejection) -> Stage {
    info!(reason = %rejection, "No usable document outline; keeping original image");
    Stage::Rejected(rejection)
}

#[cfg(feature = "rten")]
fn open_session(config: &RectifierConfig) -> Result<Box<dyn InferenceSession>> {
    let session = super::rten_session::RtenSession::load(&config.model_path, config.num_threads)?;
    Ok(Box::new(session))
}

#[cfg(not(feature = "rten"))]
fn open_session(config: &RectifierConfig) -> Result<Box<dyn InferenceSession>> {
    Err(RichtwerkError::SessionInit(format!(
        "cannot open {}: built without the `rten` inference backend",
        config.model_path.display()
    )))
}

/// Document rectifier.
///
/// Holds a single inference session behind a mutex, so one instance can be
/// shared across worker threads; inference calls are serialised while the
/// geometry and warp run in parallel.
///
/// # Example
///
/// ```rust,no_run
/// use richtwerk_core::RectifierConfig;
/// use richtwerk_document::Rectifier;
///
/// let config = RectifierConfig { enabled: true, ..RectifierConfig::default() };
/// let rectifier = Rectifier::new(config).expect("model loads");
///
/// let page = image::open("photo.jpg").unwrap();
/// let rectified = match rectifier.apply(page) {
///     Ok(done) => done.image,
///     Err(failed) => failed.image,
/// };
/// rectified.save("page.png").unwrap();
/// ```
pub struct Rectifier {
    config: RectifierConfig,
    session: Mutex<Option<Box<dyn InferenceSession>>>,
    io: Option<ModelIo>,
    debug: Option<DebugArtifacts>,
}

impl Rectifier {
    /// Build a rectifier from `config`.
    ///
    /// A disabled config never touches the model. Otherwise the model file
    /// must exist and load with exactly one input and one output.
    ///
    /// # Errors
    ///
    /// [`RichtwerkError::InvalidConfig`], [`RichtwerkError::ModelNotFound`],
    /// [`RichtwerkError::SessionInit`] or [`RichtwerkError::UnexpectedIoShape`].
    #[instrument(skip_all, fields(enabled = config.enabled, method = %config.method))]
    pub fn new(config: RectifierConfig) -> Result<Self> {
        config.validate()?;
        if !config.enabled {
            info!("Document rectification disabled");
            return Ok(Self {
                config,
                session: Mutex::new(None),
                io: None,
                debug: None,
            });
        }

        if !config.model_path.exists() {
            return Err(RichtwerkError::ModelNotFound(config.model_path.clone()));
        }
        let session = open_session(&config)?;
        Self::build(config, session)
    }

    /// Build an active rectifier around an already-open session.
    ///
    /// `config.enabled` is forced on; `model_path` is only used if the
    /// rectifier is later reconfigured onto a different model.
    pub fn with_session(mut config: RectifierConfig, session: Box<dyn InferenceSession>) -> Result<Self> {
        config.validate()?;
        config.enabled = true;
        Self::build(config, session)
    }

    fn build(config: RectifierConfig, session: Box<dyn InferenceSession>) -> Result<Self> {
        let io = ModelIo::resolve(session.as_ref(), &config)?;
        let debug = config.debug_dir.as_deref().and_then(DebugArtifacts::new);
        info!(
            input = %io.input,
            output = %io.output,
            width = io.input_width,
            height = io.input_height,
            "Rectifier ready"
        );
        Ok(Self {
            config,
            session: Mutex::new(Some(session)),
            io: Some(io),
            debug,
        })
    }

    pub fn config(&self) -> &RectifierConfig {
        &self.config
    }

    /// Resolved model contract, `None` when disabled.
    pub fn model_io(&self) -> Option<&ModelIo> {
        self.io.as_ref()
    }

    /// Whether a session is open.
    pub fn is_active(&self) -> bool {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Release the session. Safe to call repeatedly and on a rectifier that
    /// never opened one.
    pub fn close(&self) {
        let mut session = self.session.lock().unwrap_or_else(PoisonError::into_inner);
        if session.take().is_some() {
            info!("Inference session released");
        }
    }

    /// Rectify one image.
    ///
    /// Disabled rectifiers and rejected frames return the input unchanged
    /// with an [`Outcome`] saying why. Failures while normalising, running
    /// or decoding the model output return [`ApplyError`], which still
    /// carries the original image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn apply(&self, image: DynamicImage) -> std::result::Result<Rectified, ApplyError> {
        let Some(io) = self.io.as_ref() else {
            return Ok(Rectified::unchanged(image, Outcome::Disabled));
        };

        match self.run(&image, io) {
            Ok(Stage::Inactive) => Ok(Rectified::unchanged(image, Outcome::Disabled)),
            Ok(Stage::Rejected(rejection)) => Ok(Rectified::unchanged(image, Outcome::Rejected(rejection))),
            Ok(Stage::Warped {
                image: warped,
                quad,
                width,
                height,
            }) => {
                info!(width, height, "Document rectified");
                Ok(Rectified {
                    image: DynamicImage::ImageRgba8(warped),
                    outcome: Outcome::Warped { quad, width, height },
                })
            }
            Err(error) => {
                warn!(error = %error, "Rectification failed; returning original image");
                Err(ApplyError { image, error })
            }
        }
    }

    /// Variant of [`apply`](Self::apply) for callers that may hold no image.
    ///
    /// A disabled rectifier accepts `None` and returns `None`; an active one
    /// reports [`RichtwerkError::NilImage`]. Errors are flattened into
    /// [`RichtwerkError`], so use `apply` to keep the original image on
    /// failure.
    pub fn apply_optional(&self, image: Option<DynamicImage>) -> Result<Option<Rectified>> {
        match image {
            Some(image) => self.apply(image).map(Some).map_err(RichtwerkError::from),
            None if self.is_active() => Err(RichtwerkError::NilImage),
            None => Ok(None),
        }
    }

    /// Swap in a new configuration.
    ///
    /// The session is reopened only when `enabled`, `model_path` or
    /// `num_threads` changed. On error the previous configuration and
    /// session stay in effect.
    #[instrument(skip_all, fields(enabled = config.enabled))]
    pub fn reconfigure(&mut self, config: RectifierConfig) -> Result<()> {
        config.validate()?;

        let session = self.session.get_mut().unwrap_or_else(PoisonError::into_inner);
        let reopen = config.enabled
            && (session.is_none()
                || config.model_path != self.config.model_path
                || config.num_threads != self.config.num_threads);

        if !config.enabled {
            if session.take().is_some() {
                info!("Rectification disabled; inference session released");
            }
            self.io = None;
        } else if reopen {
            if !config.model_path.exists() {
                return Err(RichtwerkError::ModelNotFound(config.model_path.clone()));
            }
            let fresh = open_session(&config)?;
            let io = ModelIo::resolve(fresh.as_ref(), &config)?;
            *session = Some(fresh);
            self.io = Some(io);
            info!(model = %config.model_path.display(), "Inference session reopened");
        } else if let Some(open) = session.as_deref() {
            self.io = Some(ModelIo::resolve(open, &config)?);
        }

        self.debug = config.debug_dir.as_deref().and_then(DebugArtifacts::new);
        self.config = config;
        Ok(())
    }

    fn run(&self, image: &DynamicImage, io: &ModelIo) -> Result<Stage> {
        let tensor = normalize_to_tensor(image, io.input_width, io.input_height)?;

        let output = {
            let mut session = self
                .session
                .lock()
                .map_err(|_| RichtwerkError::Inference("inference session lock poisoned".into()))?;
            let Some(session) = session.as_mut() else {
                debug!("Session closed; passing image through");
                return Ok(Stage::Inactive);
            };
            session.run(tensor)?
        };
        debug!(shape = ?output.shape(), "Model output received");

        let stamp = self.debug.as_ref().map(|_| next_stamp());
        let artifacts = self.debug.as_ref().zip(stamp.as_deref());

        let (quad, frame) = match self.config.method {
            RectificationMethod::UvDocMask => {
                let mask = MaskPlane::from_output(&output)?;
                if let Some((debug, stamp)) = artifacts {
                    debug.write_mask(&mask, stamp);
                }
                let frame = Frame {
                    width: mask.width() as f64,
                    height: mask.height() as f64,
                };
                match quad_from_mask(&mask, self.config.mask_threshold, self.config.min_mask_coverage) {
                    Ok(quad) => (quad, frame),
                    Err(rejection) => return Ok(reject(rejection)),
                }
            }
            RectificationMethod::DocTrCorners => {
                let values = output.to_vec();
                let quad = quad_from_corners(&values, io.input_width, io.input_height)?;
                (quad, Frame::new(io.input_width, io.input_height))
            }
        };

        let sx = f64::from(image.width()) / frame.width;
        let sy = f64::from(image.height()) / frame.height;
        let source_quad = quad.map(|p| p.scale(sx, sy));
        debug!(sx, sy, quad = ?source_quad, "Quadrilateral rescaled to source");

        let mut source = None;
        if let Some((debug, stamp)) = artifacts {
            debug.write_outline(source.insert(image.to_rgba8()), &source_quad, stamp);
        }

        if let Err(rejection) = check_quadrilateral(&quad, frame, &self.config) {
            return Ok(reject(rejection));
        }

        let Some((width, height)) = output_size(&source_quad, self.config.effective_output_height()) else {
            let edges = edge_lengths(&source_quad);
            return Ok(reject(Rejection::OutputTooSmall {
                avg_width: edges.avg_width,
                avg_height: edges.avg_height,
            }));
        };

        let source = source.unwrap_or_else(|| image.to_rgba8());
        let warped = match warp_perspective(&source, &source_quad, width, height) {
            Ok(warped) => warped,
            Err(err) => return Ok(reject(err.into())),
        };

        if let Some((debug, stamp)) = artifacts {
            debug.write_comparison(&source, &source_quad, &warped, stamp);
        }

        Ok(Stage::Warped {
            image: warped,
            quad: source_quad,
            width,
            height,
        })
    }
}
