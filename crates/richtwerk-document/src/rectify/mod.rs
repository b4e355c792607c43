// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rectification pipeline — inference boundary, output interpretation,
// plausibility gates, debug artifacts, and the orchestrator tying them
// together.

pub mod debug;
pub mod inference;
pub mod interpret;
pub mod outcome;
pub mod rectifier;
#[cfg(feature = "rten")]
pub mod rten_session;
pub mod validate;

pub use inference::{InferenceSession, TensorDescriptor};
pub use outcome::{ApplyError, Outcome, Rectified, Rejection};
pub use rectifier::{ModelIo, Rectifier};
#[cfg(feature = "rten")]
pub use rten_session::RtenSession;
