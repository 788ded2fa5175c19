// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The model-provider contract. Providers are an external collaborator: this
//! crate only defines the shape a worker, planner, or coordinator dispatches
//! through, plus a fake implementation for tests.

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::message::{ChatMessage, Completion};

/// A bound language-model backend. Implementations live outside this crate in
/// production; `FakeProvider` below is the only concrete implementation shipped
/// here, for deterministic tests.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Completes a chat transcript. Implementations should surface transient,
    /// capability, and malformed-output failures as distinct `ProviderError`
    /// variants so callers can classify them without string matching.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, ProviderError>;

    /// A short human-readable identifier used in logs and worker descriptions.
    fn name(&self) -> &str;
}
