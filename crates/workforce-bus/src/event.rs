// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-process event published on the bus.

use serde::{Deserialize, Serialize};

use workforce_core::id::{TaskId, WorkerId};

/// The internal action taken by a published event. Distinct from the wire
/// event names used over SSE: the hook pipeline publishes `AgentActivated`
/// before a model call and the SSE adapter projects it onto the wire event
/// `activate_agent`, for example. `workforce-server` owns the projection map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkforceAction {
    Confirmed,
    TaskDecomposed,
    SubtasksReady,
    TaskAssigned,
    AgentActivated,
    AgentDeactivated,
    TaskStateChanged,
    NewTaskState,
    ToolkitActivated,
    ToolkitDeactivated,
    WaitConfirm,
    Ask,
    Notice,
    WriteFile,
    Terminal,
    BudgetNotEnough,
    ContextTooLong,
    TaskAdded,
    TaskRemoved,
    SessionEnded,
    SessionError,
}

/// The in-process unit published on the bus. Persisted to the append-only
/// event log; never mutated after publish.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub action: WorkforceAction,
    pub data: serde_json::Value,
    pub timestamp_ms: i64,
    pub task_id: Option<TaskId>,
    pub agent_id: Option<WorkerId>,
}

impl Event {
    pub fn new(action: WorkforceAction, data: serde_json::Value, timestamp_ms: i64) -> Self {
        Self {
            action,
            data,
            timestamp_ms,
            task_id: None,
            agent_id: None,
        }
    }

    pub fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    pub fn with_agent(mut self, agent_id: WorkerId) -> Self {
        self.agent_id = Some(agent_id);
        self
    }
}
