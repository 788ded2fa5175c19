// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// Errors surfaced by a model provider. Every caller in this workspace catches
/// these and reduces them to a documented fallback; they never propagate raw.
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("context window exceeded: current {current_length}, max {max_length}")]
    ContextTooLong {
        current_length: usize,
        max_length: usize,
    },
    #[error("budget exhausted")]
    BudgetNotEnough,
    #[error("provider returned malformed output: {0}")]
    Malformed(String),
    #[error("provider error: {0}")]
    Other(String),
}
