// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TaskLock: per-project state container.

use parking_lot::{Mutex, RwLock};
use tokio::sync::Notify;
use tracing::{info, warn};

use workforce_core::id::SessionId;

use crate::action::ActionRecord;
use crate::background::BackgroundTasks;
use crate::conversation::{ConversationHistory, ConversationRole, DEFAULT_CHARACTER_CAP};
use crate::human_input::HumanInputRegistry;
use crate::queue::{ActionQueue, QueueFullError, DEFAULT_CAPACITY};
use crate::status::{IllegalTransition, TaskLockStatus};

/// Per-project state container: status, action queue, conversation history,
/// background-task registry, and human-input queues. Exactly one instance
/// exists per `project_id` at a time (enforced by `TaskLockRegistry`).
pub struct TaskLock {
    pub project_id: SessionId,
    status: RwLock<TaskLockStatus>,
    status_changed: Notify,
    pub action_queue: ActionQueue,
    pub conversation_history: ConversationHistory,
    pub background_tasks: BackgroundTasks,
    pub human_input: HumanInputRegistry,
    last_task_result: Mutex<Option<serde_json::Value>>,
    last_task_summary: Mutex<Option<String>>,
    pending_task_updates: Mutex<Vec<serde_json::Value>>,
}

impl TaskLock {
    pub fn new(project_id: impl Into<SessionId>) -> Self {
        Self::with_capacities(project_id, DEFAULT_CAPACITY, DEFAULT_CHARACTER_CAP)
    }

    pub fn with_capacities(
        project_id: impl Into<SessionId>,
        queue_capacity: usize,
        conversation_cap: usize,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            status: RwLock::new(TaskLockStatus::Confirming),
            status_changed: Notify::new(),
            action_queue: ActionQueue::new(queue_capacity),
            conversation_history: ConversationHistory::new(conversation_cap),
            background_tasks: BackgroundTasks::new(),
            human_input: HumanInputRegistry::new(),
            last_task_result: Mutex::new(None),
            last_task_summary: Mutex::new(None),
            pending_task_updates: Mutex::new(Vec::new()),
        }
    }

    pub fn status(&self) -> TaskLockStatus {
        *self.status.read()
    }

    pub fn set_status(&self, next: TaskLockStatus) -> Result<(), IllegalTransition> {
        let mut current = self.status.write();
        if !current.can_transition_to(next) {
            return Err(IllegalTransition {
                from: *current,
                to: next,
            });
        }
        info!(from = ?*current, to = ?next, project_id = %self.project_id, "tasklock status transition");
        *current = next;
        drop(current);
        self.status_changed.notify_waiters();
        Ok(())
    }

    /// Blocks until `predicate` holds of the current status, re-checking on
    /// every transition. Registers interest before the first check so a
    /// transition landing between the check and the wait is never missed.
    pub async fn wait_for_status(&self, predicate: impl Fn(TaskLockStatus) -> bool) {
        loop {
            let changed = self.status_changed.notified();
            if predicate(self.status()) {
                return;
            }
            changed.await;
        }
    }

    /// Queues a client-submitted task update for the running execution to
    /// pick up, waking anyone blocked in `wait_for_status`/`wait_for_update`.
    pub fn queue_task_update(&self, update: serde_json::Value) {
        self.pending_task_updates.lock().push(update);
        self.status_changed.notify_waiters();
    }

    /// Drains and returns every task update queued since the last call.
    pub fn take_pending_task_updates(&self) -> Vec<serde_json::Value> {
        std::mem::take(&mut *self.pending_task_updates.lock())
    }

    pub async fn put_action(&self, record: ActionRecord) -> Result<(), QueueFullError> {
        self.action_queue.put(record).await
    }

    pub fn add_conversation(&self, role: ConversationRole, content: String, timestamp_ms: i64) {
        self.conversation_history.append(role, content, timestamp_ms);
    }

    pub fn update_last_task_result(&self, result: serde_json::Value, summary: Option<String>) {
        *self.last_task_result.lock() = Some(result);
        if let Some(summary) = summary {
            *self.last_task_summary.lock() = Some(summary);
        }
    }

    pub fn last_task_result(&self) -> Option<serde_json::Value> {
        self.last_task_result.lock().clone()
    }

    pub fn last_task_summary(&self) -> Option<String> {
        self.last_task_summary.lock().clone()
    }

    /// Cancels background tasks and drains the action queue. Idempotent via
    /// `BackgroundTasks::cleanup`.
    pub async fn cleanup(&self) {
        self.background_tasks.cleanup();
        self.action_queue.drain().await;
        if self.background_tasks.count() > 0 {
            warn!(project_id = %self.project_id, "background tasks remained after cleanup");
        }
    }
}

#[cfg(test)]
#[path = "tasklock_tests.rs"]
mod tests;
