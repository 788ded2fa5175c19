// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task result records.

use serde::{Deserialize, Serialize};

use crate::id::{TaskId, WorkerId};

/// The outcome of one worker attempt at a subtask.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: TaskId,
    pub worker_id: WorkerId,
    pub success: bool,
    pub output: serde_json::Value,
    /// Present iff `!success`.
    pub error: Option<String>,
    pub duration_ms: u64,
    pub attempt_number: u32,
}

impl TaskResult {
    pub fn success(
        task_id: TaskId,
        worker_id: WorkerId,
        output: impl Into<serde_json::Value>,
        duration_ms: u64,
        attempt_number: u32,
    ) -> Self {
        Self {
            task_id,
            worker_id,
            success: true,
            output: output.into(),
            error: None,
            duration_ms,
            attempt_number,
        }
    }

    pub fn failure(
        task_id: TaskId,
        worker_id: WorkerId,
        error: impl Into<String>,
        duration_ms: u64,
        attempt_number: u32,
    ) -> Self {
        Self {
            task_id,
            worker_id,
            success: false,
            output: serde_json::Value::Null,
            error: Some(error.into()),
            duration_ms,
            attempt_number,
        }
    }
}
