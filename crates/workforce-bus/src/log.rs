// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only event log, scoped to a session.

use parking_lot::RwLock;

use workforce_core::id::{TaskId, WorkerId};

use crate::event::{Event, WorkforceAction};

/// An append-only ordered sequence of events. Readers snapshot-safe via
/// position indexing: `append` never removes or reorders prior entries.
#[derive(Default)]
pub struct EventLog {
    entries: RwLock<Vec<Event>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, event: Event) -> u64 {
        let mut entries = self.entries.write();
        entries.push(event);
        (entries.len() - 1) as u64
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Filters the log by optional `task_id`, `agent_id`, and `action`, applying
    /// last-N semantics when `limit` is set.
    pub fn history(
        &self,
        task_id: Option<&TaskId>,
        agent_id: Option<&WorkerId>,
        action: Option<WorkforceAction>,
        limit: Option<usize>,
    ) -> Vec<Event> {
        let entries = self.entries.read();
        let mut matched: Vec<Event> = entries
            .iter()
            .filter(|e| task_id.map(|t| e.task_id.as_ref() == Some(t)).unwrap_or(true))
            .filter(|e| agent_id.map(|a| e.agent_id.as_ref() == Some(a)).unwrap_or(true))
            .filter(|e| action.map(|a| e.action == a).unwrap_or(true))
            .cloned()
            .collect();
        if let Some(limit) = limit {
            if matched.len() > limit {
                let start = matched.len() - limit;
                matched = matched.split_off(start);
            }
        }
        matched
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
