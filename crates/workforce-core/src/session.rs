// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaboration context / session: the root entity owning a plan run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::id::{SessionId, WorkerId};

/// Attributes of a collaboration session. Owns the subtask graph, result map,
/// assignment, worker pool, and TaskLock (the latter three live in sibling
/// crates and are threaded alongside this struct rather than nested inside it,
/// to keep each owned independently behind its own lock).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationContext {
    pub session_id: SessionId,
    pub participants: Vec<WorkerId>,
    pub current_phase: String,
    pub objectives: String,
    #[serde(default)]
    pub shared_state: HashMap<String, serde_json::Value>,
    pub deadline_ms: Option<i64>,
}

impl CollaborationContext {
    pub fn new(session_id: impl Into<SessionId>, objectives: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            participants: Vec::new(),
            current_phase: "created".to_string(),
            objectives: objectives.into(),
            shared_state: HashMap::new(),
            deadline_ms: None,
        }
    }

    pub fn add_participant(&mut self, worker_id: WorkerId) {
        if !self.participants.contains(&worker_id) {
            self.participants.push(worker_id);
        }
    }
}
