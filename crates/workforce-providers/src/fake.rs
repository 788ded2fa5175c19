// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test doubles for `LlmProvider`.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ProviderError;
use crate::message::{ChatMessage, Completion, TokenUsage};
use crate::provider::LlmProvider;

/// One scripted response: either a successful completion body or an error to return.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    Ok(String),
    Err(ProviderError),
}

/// A provider that returns pre-scripted responses in order, then repeats the
/// last one. Used throughout the engine and server test suites to drive
/// deterministic planner/coordinator/worker behaviour without a live model.
pub struct FakeProvider {
    name: String,
    responses: Mutex<Vec<ScriptedResponse>>,
    cursor: Mutex<usize>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeProvider {
    pub fn new(name: impl Into<String>, responses: Vec<ScriptedResponse>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(responses),
            cursor: Mutex::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A provider that always returns the same fixed string.
    pub fn echo(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self::new(name, vec![ScriptedResponse::Ok(reply.into())])
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, ProviderError> {
        self.calls.lock().push(messages.to_vec());
        let responses = self.responses.lock();
        if responses.is_empty() {
            return Err(ProviderError::Other("no scripted responses".to_string()));
        }
        let mut cursor = self.cursor.lock();
        let idx = (*cursor).min(responses.len() - 1);
        *cursor += 1;
        match &responses[idx] {
            ScriptedResponse::Ok(content) => Ok(Completion {
                content: content.clone(),
                usage: TokenUsage::default(),
            }),
            ScriptedResponse::Err(err) => Err(err.clone()),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
