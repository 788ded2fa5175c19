// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-facing control actions enqueued onto a TaskLock.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Improve,
    UpdateTask,
    Start,
    Stop,
    Supplement,
    Pause,
    Resume,
    NewAgent,
    AddTask,
    RemoveTask,
    SkipTask,
}

/// An enumerated action plus its free-form payload, produced by the client-facing
/// controller and consumed by the scheduler and the SSE adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: Action,
    pub data: serde_json::Value,
    pub timestamp_ms: i64,
}

impl ActionRecord {
    pub fn new(action: Action, data: serde_json::Value, timestamp_ms: i64) -> Self {
        Self {
            action,
            data,
            timestamp_ms,
        }
    }
}
