// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The stable wire protocol streamed to clients over SSE: the 24 wire event
//! kinds, frame formatting, and the two projection maps (Workforce event ->
//! wire event, control action -> wire event) the SSE adapter drives.

use serde::{Deserialize, Serialize};

use workforce_bus::event::{Event, WorkforceAction};
use workforce_tasklock::{Action, ActionRecord};

/// The exhaustive set of 24 wire event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WireEvent {
    Confirmed,
    DecomposeText,
    ToSubTasks,
    End,
    Error,
    CreateAgent,
    ActivateAgent,
    DeactivateAgent,
    TaskState,
    AssignTask,
    NewTaskState,
    ActivateToolkit,
    DeactivateToolkit,
    WaitConfirm,
    Ask,
    Notice,
    WriteFile,
    Terminal,
    BudgetNotEnough,
    ContextTooLong,
    AddTask,
    RemoveTask,
    Sync,
}

/// One SSE frame: `{"step": <wire_event>, "data": <value>}`.
#[derive(Debug, Clone, Serialize)]
pub struct WireFrame {
    pub step: WireEvent,
    pub data: serde_json::Value,
}

impl WireFrame {
    pub fn new(step: WireEvent, data: serde_json::Value) -> Self {
        Self { step, data }
    }

    pub fn heartbeat() -> Self {
        Self::new(WireEvent::Sync, serde_json::json!({}))
    }

    /// Renders the frame in the exact `data: {json}\n\n` form clients parse.
    /// Falls back to an `error` frame if the frame itself fails to serialize
    /// (it never contains non-serializable data in practice, but the SSE
    /// adapter must not panic on a malformed payload from an upstream bug).
    pub fn to_sse_text(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("data: {json}\n\n"),
            Err(_) => "data: {\"step\":\"error\",\"data\":{\"message\":\"frame serialization failed\"}}\n\n".to_string(),
        }
    }
}

/// Projects a Workforce event onto its wire frame, per a fixed map. Events
/// with no entry are dropped (return `None`) rather than surfaced.
///
/// `create_agent` has no producing `WorkforceAction` in this implementation:
/// CREATE_WORKER recovery currently mutates the worker pool without
/// publishing a bus event (see DESIGN.md). It stays in `WireEvent` because
/// the action-record projection below can still reach it via `new_agent`.
pub fn project_event(event: &Event) -> Option<WireFrame> {
    let step = match event.action {
        WorkforceAction::Confirmed => WireEvent::Confirmed,
        WorkforceAction::TaskDecomposed => WireEvent::DecomposeText,
        WorkforceAction::SubtasksReady => WireEvent::ToSubTasks,
        WorkforceAction::TaskAssigned => WireEvent::AssignTask,
        WorkforceAction::AgentActivated => WireEvent::ActivateAgent,
        WorkforceAction::AgentDeactivated => WireEvent::DeactivateAgent,
        WorkforceAction::TaskStateChanged => WireEvent::TaskState,
        WorkforceAction::NewTaskState => WireEvent::NewTaskState,
        WorkforceAction::ToolkitActivated => WireEvent::ActivateToolkit,
        WorkforceAction::ToolkitDeactivated => WireEvent::DeactivateToolkit,
        WorkforceAction::WaitConfirm => WireEvent::WaitConfirm,
        WorkforceAction::Ask => WireEvent::Ask,
        WorkforceAction::Notice => WireEvent::Notice,
        WorkforceAction::WriteFile => WireEvent::WriteFile,
        WorkforceAction::Terminal => WireEvent::Terminal,
        WorkforceAction::BudgetNotEnough => WireEvent::BudgetNotEnough,
        WorkforceAction::ContextTooLong => WireEvent::ContextTooLong,
        WorkforceAction::TaskAdded => WireEvent::AddTask,
        WorkforceAction::TaskRemoved => WireEvent::RemoveTask,
        WorkforceAction::SessionEnded => WireEvent::End,
        WorkforceAction::SessionError => WireEvent::Error,
    };
    Some(WireFrame::new(step, event.data.clone()))
}

/// Projects a client control-action record onto its wire frame. `start`,
/// `stop`, `pause`, `resume`, `supplement`, `skip_task`, and `improve` are
/// acknowledged over the HTTP response that enqueued them and have no SSE
/// echo; only actions that mutate visible task/agent state are projected.
pub fn project_action(record: &ActionRecord) -> Option<WireFrame> {
    let step = match record.action {
        Action::UpdateTask => WireEvent::ToSubTasks,
        Action::NewAgent => WireEvent::CreateAgent,
        Action::AddTask => WireEvent::AddTask,
        Action::RemoveTask => WireEvent::RemoveTask,
        Action::Improve
        | Action::Start
        | Action::Stop
        | Action::Supplement
        | Action::Pause
        | Action::Resume
        | Action::SkipTask => return None,
    };
    Some(WireFrame::new(step, record.data.clone()))
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
