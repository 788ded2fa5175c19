// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Coordinator: assigns subtasks to workers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use workforce_core::id::{TaskId, WorkerId};
use workforce_core::{Task, Worker};
use workforce_providers::{ChatMessage, LlmProvider};

use crate::advisor::CollaborationAdvisor;

#[async_trait]
pub trait Coordinator: Send + Sync {
    /// Assigns every task to a worker id, mutating each task's `dependencies`
    /// field to match whatever the assignment process determined. Never fails:
    /// round-robin is the fallback of last resort.
    async fn assign(
        &self,
        tasks: &mut [Task],
        workers: &[Worker],
    ) -> HashMap<TaskId, WorkerId>;
}

#[derive(Debug, Deserialize)]
struct AssignmentResponse {
    assignments: Vec<AssignmentEntry>,
}

#[derive(Debug, Deserialize)]
struct AssignmentEntry {
    task_id: String,
    assignee_id: String,
    #[serde(default)]
    dependencies: Vec<String>,
}

fn round_robin(tasks: &[Task], workers: &[Worker]) -> HashMap<TaskId, WorkerId> {
    let mut mapping = HashMap::new();
    if workers.is_empty() {
        return mapping;
    }
    for (i, task) in tasks.iter().enumerate() {
        mapping.insert(task.id.clone(), workers[i % workers.len()].id.clone());
    }
    mapping
}

fn coordination_prompt(tasks: &[Task], workers: &[Worker]) -> String {
    let task_blurbs = tasks
        .iter()
        .map(|t| format!("- {} ({}): {}", t.id, t.description, t.expected_output))
        .collect::<Vec<_>>()
        .join("\n");
    let worker_blurbs = workers
        .iter()
        .map(|w| format!("- {} ({}): {}", w.id, w.role, w.description))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "Assign each task below to exactly one worker.\n\nTasks:\n{task_blurbs}\n\n\
         Workers:\n{worker_blurbs}\n\n\
         Respond with JSON: {{\"assignments\": [{{\"task_id\": ..., \"assignee_id\": ..., \
         \"dependencies\": [...]}}]}}, one entry per task."
    )
}

/// The only concrete `Coordinator`: optionally consults a collaboration
/// advisor first, then resolves any residue via a language-model provider,
/// falling back to round-robin on parse failure or an unknown worker id.
pub struct LlmCoordinator {
    provider: Arc<dyn LlmProvider>,
    advisor: Arc<dyn CollaborationAdvisor>,
}

impl LlmCoordinator {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            advisor: Arc::new(crate::advisor::NullAdvisor),
        }
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn CollaborationAdvisor>) -> Self {
        self.advisor = advisor;
        self
    }

    async fn assign_via_llm(
        &self,
        tasks: &mut [Task],
        workers: &[Worker],
    ) -> HashMap<TaskId, WorkerId> {
        let worker_ids: std::collections::HashSet<&str> =
            workers.iter().map(|w| w.id.as_str()).collect();

        let prompt = coordination_prompt(tasks, workers);
        let raw = match self.provider.complete(&[ChatMessage::user(prompt)]).await {
            Ok(completion) => completion.content,
            Err(err) => {
                warn!(error = %err, "coordinator provider call failed, using round-robin");
                return round_robin(tasks, workers);
            }
        };

        let parsed: Option<AssignmentResponse> = serde_json::from_str(&raw).ok().or_else(|| {
            // Tolerate a fenced/annotated response by extracting the first `{...}` block.
            let start = raw.find('{')?;
            let end = raw.rfind('}')?;
            serde_json::from_str(&raw[start..=end]).ok()
        });

        let Some(response) = parsed else {
            warn!("coordinator could not parse assignment response, using round-robin");
            return round_robin(tasks, workers);
        };

        let mut mapping = HashMap::new();
        let mut unassigned: Vec<usize> = Vec::new();
        for (i, task) in tasks.iter_mut().enumerate() {
            let Some(entry) = response
                .assignments
                .iter()
                .find(|e| e.task_id == task.id.as_str())
            else {
                unassigned.push(i);
                continue;
            };
            if !worker_ids.contains(entry.assignee_id.as_str()) {
                warn!(worker_id = %entry.assignee_id, "coordinator dropped unknown assignee id");
                unassigned.push(i);
                continue;
            }
            task.dependencies = entry
                .dependencies
                .iter()
                .map(|d| TaskId::new(d.clone()))
                .collect();
            mapping.insert(task.id.clone(), WorkerId::new(entry.assignee_id.clone()));
        }

        if !unassigned.is_empty() && !workers.is_empty() {
            for (n, i) in unassigned.into_iter().enumerate() {
                mapping.insert(tasks[i].id.clone(), workers[n % workers.len()].id.clone());
            }
        }
        mapping
    }
}

#[async_trait]
impl Coordinator for LlmCoordinator {
    async fn assign(
        &self,
        tasks: &mut [Task],
        workers: &[Worker],
    ) -> HashMap<TaskId, WorkerId> {
        if workers.is_empty() {
            return HashMap::new();
        }

        let proposed = self.advisor.propose_assignment(tasks, workers);
        let worker_ids: std::collections::HashSet<&str> =
            workers.iter().map(|w| w.id.as_str()).collect();

        let mut mapping = HashMap::new();
        let mut residue: Vec<Task> = Vec::new();
        let mut residue_idx: Vec<usize> = Vec::new();
        for (i, task) in tasks.iter().enumerate() {
            match proposed.get(task.id.as_str()) {
                Some(worker_id) if worker_ids.contains(worker_id.as_str()) => {
                    mapping.insert(task.id.clone(), worker_id.clone());
                }
                Some(worker_id) => {
                    warn!(worker_id = %worker_id, "advisor proposed unknown worker id, deferring to language model");
                    residue.push(task.clone());
                    residue_idx.push(i);
                }
                None => {
                    residue.push(task.clone());
                    residue_idx.push(i);
                }
            }
        }

        if residue.is_empty() {
            return mapping;
        }

        let residue_mapping = self.assign_via_llm(&mut residue, workers).await;
        for (slot, original_idx) in residue_idx.into_iter().enumerate() {
            tasks[original_idx].dependencies = residue[slot].dependencies.clone();
            if let Some(worker_id) = residue_mapping.get(&residue[slot].id) {
                mapping.insert(tasks[original_idx].id.clone(), worker_id.clone());
            }
        }
        mapping
    }
}

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;
