// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide registry mapping `project_id` to its `TaskLock`.
//!
//! Constructed once at server startup and plumbed by reference (an instance
//! field of the server's `AppState`), rather than a true global singleton, so
//! tests stay isolable.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use workforce_core::id::SessionId;

use crate::tasklock::TaskLock;

#[derive(Default)]
pub struct TaskLockRegistry {
    locks: Mutex<HashMap<SessionId, Arc<TaskLock>>>,
}

impl TaskLockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the existing TaskLock for `project_id`, or creates and inserts
    /// a fresh one. Exactly one TaskLock exists per `project_id` at a time.
    pub fn get_or_create(&self, project_id: impl Into<SessionId> + Clone) -> Arc<TaskLock> {
        let mut locks = self.locks.lock();
        locks
            .entry(project_id.clone().into())
            .or_insert_with(|| Arc::new(TaskLock::new(project_id.into())))
            .clone()
    }

    pub fn get(&self, project_id: &SessionId) -> Option<Arc<TaskLock>> {
        self.locks.lock().get(project_id).cloned()
    }

    /// Removes and returns the TaskLock for `project_id`, if any. Callers are
    /// responsible for calling `cleanup()` on the returned lock.
    pub fn remove(&self, project_id: &SessionId) -> Option<Arc<TaskLock>> {
        self.locks.lock().remove(project_id)
    }

    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
