// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared core error kinds, re-exported by every crate that builds on `workforce-core`.

use thiserror::Error;

/// The four error kinds named in the error-handling design: transient failures
/// retry, capability failures reassign or synthesize a worker, semantic failures
/// replan, fatal failures propagate to a terminal state.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    #[error("transient error (network, rate-limit, timeout)")]
    Transient,
    #[error("capability error (wrong worker for the task)")]
    Capability,
    #[error("semantic error (task ambiguous or output malformed)")]
    Semantic,
    #[error("fatal error (invariant violated or configuration missing)")]
    Fatal,
}

pub use crate::task::GraphError;
