// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inference collaborator boundary — the narrow interface the rectifier uses
// to talk to a model backend.

use std::fmt;

use richtwerk_core::error::Result;
use rten_tensor::{NdTensor, Tensor};

/// Name and shape of a model input or output. `None` marks a dynamic
/// (symbolic) dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TensorDescriptor {
    pub name: String,
    pub shape: Vec<Option<usize>>,
}

impl TensorDescriptor {
    pub fn new(name: impl Into<String>, shape: Vec<Option<usize>>) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// `(width, height)` of an NCHW descriptor when both trailing dimensions
    /// are fixed and non-zero.
    pub fn spatial_size(&self) -> Option<(u32, u32)> {
        match self.shape.as_slice() {
            [_, _, Some(h), Some(w)] if *h > 0 && *w > 0 => {
                Some((u32::try_from(*w).ok()?, u32::try_from(*h).ok()?))
            }
            _ => None,
        }
    }

    /// Fixed channel count of an NCHW descriptor.
    pub fn channels(&self) -> Option<usize> {
        match self.shape.as_slice() {
            [_, c, _, _] => *c,
            _ => None,
        }
    }
}

impl fmt::Display for TensorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.name)?;
        for (i, dim) in self.shape.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match dim {
                Some(n) => write!(f, "{n}")?,
                None => f.write_str("?")?,
            }
        }
        f.write_str("]")
    }
}

/// A loaded model that turns one `(1, 3, H, W)` tensor into one output
/// tensor.
///
/// Implementations are stateful and need not be reentrant; the rectifier
/// serialises calls. Dropping the session releases its resources.
pub trait InferenceSession: Send {
    fn input(&self) -> &TensorDescriptor;

    fn output(&self) -> &TensorDescriptor;

    /// Run the model on a normalised image tensor.
    ///
    /// Backend failures map to [`RichtwerkError::Inference`](richtwerk_core::RichtwerkError::Inference).
    fn run(&mut self, input: NdTensor<f32, 4>) -> Result<Tensor<f32>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_size_of_fixed_nchw() {
        let desc = TensorDescriptor::new("image", vec![Some(1), Some(3), Some(712), Some(488)]);
        assert_eq!(desc.rank(), 4);
        assert_eq!(desc.channels(), Some(3));
        assert_eq!(desc.spatial_size(), Some((488, 712)));
    }

    #[test]
    fn dynamic_dims_have_no_spatial_size() {
        let desc = TensorDescriptor::new("image", vec![None, Some(3), None, None]);
        assert_eq!(desc.spatial_size(), None);
        assert_eq!(TensorDescriptor::new("flat", vec![Some(8)]).spatial_size(), None);
        assert_eq!(
            TensorDescriptor::new("zero", vec![Some(1), Some(3), Some(0), Some(4)]).spatial_size(),
            None
        );
    }

    #[test]
    fn display_marks_dynamic_dims() {
        let desc = TensorDescriptor::new("mask", vec![None, Some(3), Some(64), Some(64)]);
        assert_eq!(desc.to_string(), "mask[?, 3, 64, 64]");
    }
}
