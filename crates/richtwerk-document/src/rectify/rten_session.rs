// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Model-backed inference session using the pure-Rust `rten` runtime.
//
// # Feature Gate
//
// Only compiled with the `rten` feature:
//
// ```toml
// richtwerk-document = { path = "crates/richtwerk-document", features = ["rten"] }
// ```
//
// Models must be in `.rten` format. ONNX exports of UVDoc / DocTR style
// rectification networks can be converted with `rten-convert`.

use std::path::Path;
use std::sync::Arc;

use richtwerk_core::RichtwerkError;
use richtwerk_core::error::Result;
use rten::{Dimension, Model, NodeId, RunOptions, ThreadPool};
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};
use tracing::{debug, info, instrument};

use super::inference::{InferenceSession, TensorDescriptor};

/// An `.rten` model with exactly one input and one output.
pub struct RtenSession {
    model: Model,
    input: TensorDescriptor,
    output: TensorDescriptor,
    /// Dedicated pool; `None` runs on rten's global pool.
    pool: Option<Arc<ThreadPool>>,
}

impl RtenSession {
    /// Load the model at `path`.
    ///
    /// A non-zero `num_threads` gives the session its own pool of that many
    /// threads; `0` uses rten's global pool.
    ///
    /// # Errors
    ///
    /// - [`RichtwerkError::ModelNotFound`] if the file does not exist.
    /// - [`RichtwerkError::SessionInit`] if the file cannot be parsed.
    /// - [`RichtwerkError::UnexpectedIoShape`] unless the graph has exactly
    ///   one input and one output.
    #[instrument(skip_all, fields(model = %path.display(), num_threads))]
    pub fn load(path: &Path, num_threads: usize) -> Result<Self> {
        if !path.exists() {
            return Err(RichtwerkError::ModelNotFound(path.to_path_buf()));
        }

        info!("Loading rectification model");
        let model = Model::load_file(path).map_err(|err| {
            RichtwerkError::SessionInit(format!(
                "failed to load model from {}: {}",
                path.display(),
                err
            ))
        })?;

        let (inputs, outputs) = (model.input_ids(), model.output_ids());
        let (&[input_id], &[output_id]) = (inputs, outputs) else {
            return Err(RichtwerkError::UnexpectedIoShape(format!(
                "model has {} inputs and {} outputs",
                inputs.len(),
                outputs.len()
            )));
        };

        let input = describe(&model, input_id, "input");
        let output = describe(&model, output_id, "output");
        info!(%input, %output, "Rectification model loaded");

        Ok(Self {
            model,
            input,
            output,
            pool: thread_pool(num_threads),
        })
    }

    /// Whether inference runs on a session-owned pool.
    pub fn has_own_pool(&self) -> bool {
        self.pool.is_some()
    }
}

fn thread_pool(num_threads: usize) -> Option<Arc<ThreadPool>> {
    (num_threads > 0).then(|| {
        debug!(num_threads, "Creating inference thread pool");
        Arc::new(ThreadPool::with_num_threads(num_threads))
    })
}

fn describe(model: &Model, id: NodeId, fallback_name: &str) -> TensorDescriptor {
    let Some(info) = model.node_info(id) else {
        return TensorDescriptor::new(fallback_name, Vec::new());
    };
    let name = info.name().unwrap_or(fallback_name).to_string();
    let shape = info
        .shape()
        .unwrap_or_default()
        .into_iter()
        .map(|dim| match dim {
            Dimension::Fixed(n) => Some(n),
            Dimension::Symbolic(_) => None,
        })
        .collect();
    TensorDescriptor::new(name, shape)
}

impl InferenceSession for RtenSession {
    fn input(&self) -> &TensorDescriptor {
        &self.input
    }

    fn output(&self) -> &TensorDescriptor {
        &self.output
    }

    fn run(&mut self, input: NdTensor<f32, 4>) -> Result<Tensor<f32>> {
        debug!(shape = ?input.shape(), "Running rectification model");
        let options = self.pool.as_ref().map(|pool| RunOptions::default().with_thread_pool(Some(Arc::clone(pool))));
        let output = self
            .model
            .run_one(input.view().into(), options)
            .map_err(|err| RichtwerkError::Inference(err.to_string()))?;
        output
            .try_into()
            .map_err(|err| RichtwerkError::UnexpectedOutputShape(format!("expected f32 tensor: {err:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_model_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.rten");
        assert!(matches!(
            RtenSession::load(&path, 0),
            Err(RichtwerkError::ModelNotFound(p)) if p == path
        ));
    }

    #[test]
    fn thread_count_selects_pool() {
        assert!(thread_pool(0).is_none());
        assert!(thread_pool(1).is_some());
        assert!(thread_pool(4).is_some());
    }

    #[test]
    fn garbage_model_fails_session_init() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.rten");
        std::fs::write(&path, b"definitely not a model").unwrap();
        assert!(matches!(
            RtenSession::load(&path, 0),
            Err(RichtwerkError::SessionInit(_))
        ));
    }
}
