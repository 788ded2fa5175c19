// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker entity: a role/capability set bound to a model provider.

use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};

use crate::id::{TaskId, WorkerId};

pub const DEFAULT_WORKFLOW_MEMORY_CAPACITY: usize = 10;

/// One recorded attempt at a subtask, kept regardless of outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub task_id: TaskId,
    pub success: bool,
    pub error: Option<String>,
    pub duration_ms: u64,
    pub timestamp_ms: i64,
}

/// A summary pushed onto a worker's workflow memory after a successful attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowMemoryEntry {
    pub task_id: TaskId,
    pub task_description: String,
    pub result: serde_json::Value,
    pub worker_id: WorkerId,
    pub timestamp_ms: i64,
}

/// A runtime binding of a role/capability set to a model provider.
///
/// Owned exclusively by the session; the scheduler holds only a reference while a
/// subtask is in flight on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub id: WorkerId,
    pub role: String,
    pub capabilities: HashSet<String>,
    pub description: String,
    pub attempt_history: Vec<AttemptRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_memory: Option<VecDeque<WorkflowMemoryEntry>>,
    workflow_memory_capacity: usize,
}

impl Worker {
    pub fn new(id: impl Into<WorkerId>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: role.into(),
            capabilities: HashSet::new(),
            description: String::new(),
            attempt_history: Vec::new(),
            workflow_memory: None,
            workflow_memory_capacity: DEFAULT_WORKFLOW_MEMORY_CAPACITY,
        }
    }

    pub fn with_capabilities(mut self, capabilities: impl IntoIterator<Item = String>) -> Self {
        self.capabilities = capabilities.into_iter().collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Enables workflow memory with the given capacity (default 10 if omitted).
    pub fn with_workflow_memory(mut self, capacity: usize) -> Self {
        self.workflow_memory = Some(VecDeque::with_capacity(capacity));
        self.workflow_memory_capacity = capacity;
        self
    }

    pub fn record_attempt(&mut self, record: AttemptRecord) {
        self.attempt_history.push(record);
    }

    /// Pushes a summary onto the workflow memory FIFO, evicting the oldest entry
    /// when at capacity. No-op if workflow memory is disabled for this worker.
    pub fn push_workflow_memory(&mut self, entry: WorkflowMemoryEntry) {
        let Some(memory) = self.workflow_memory.as_mut() else {
            return;
        };
        if memory.len() >= self.workflow_memory_capacity {
            memory.pop_front();
        }
        memory.push_back(entry);
    }

    pub fn workflow_memory_snapshot(&self) -> Vec<&WorkflowMemoryEntry> {
        self.workflow_memory
            .as_ref()
            .map(|m| m.iter().collect())
            .unwrap_or_default()
    }

    pub fn has_capability(&self, capability: &str) -> bool {
        self.capabilities.contains(capability)
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
