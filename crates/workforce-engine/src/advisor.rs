// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaboration-intelligence advisor: a pluggable smart-assignment hook
//! consulted by the coordinator before the LLM/round-robin path.

use workforce_core::id::WorkerId;
use workforce_core::{Task, Worker};

/// Converts tasks to the advisor's own schema and proposes an assignment.
/// Worker ids the advisor returns that are not in the current worker set are
/// dropped (with a warning) by the coordinator, which falls back to the
/// language-model path for the residue.
pub trait CollaborationAdvisor: Send + Sync {
    /// Returns a partial `task_id -> worker_id` mapping; tasks omitted from the
    /// result fall through to the LLM/round-robin path.
    fn propose_assignment(
        &self,
        tasks: &[Task],
        workers: &[Worker],
    ) -> std::collections::HashMap<String, WorkerId>;
}

/// The default advisor: proposes nothing, so every task goes through the
/// LLM/round-robin path.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAdvisor;

impl CollaborationAdvisor for NullAdvisor {
    fn propose_assignment(
        &self,
        _tasks: &[Task],
        _workers: &[Worker],
    ) -> std::collections::HashMap<String, WorkerId> {
        std::collections::HashMap::new()
    }
}

/// Greedy capability-set-intersection advisor: assigns each task to the worker
/// whose capability set overlaps the task's declared requirements (read from
/// `task.context["required_capabilities"]`, a JSON array of strings) the most.
/// Ties keep the first candidate in worker order; tasks with no declared
/// requirements, or no worker with any overlap, are left unassigned.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapabilityMatchAdvisor;

impl CollaborationAdvisor for CapabilityMatchAdvisor {
    fn propose_assignment(
        &self,
        tasks: &[Task],
        workers: &[Worker],
    ) -> std::collections::HashMap<String, WorkerId> {
        let mut assignment = std::collections::HashMap::new();
        for task in tasks {
            let Some(required) = task.context.get("required_capabilities").and_then(|v| v.as_array())
            else {
                continue;
            };
            let required: Vec<&str> = required.iter().filter_map(|v| v.as_str()).collect();
            if required.is_empty() {
                continue;
            }

            let best = workers
                .iter()
                .map(|w| {
                    let overlap = required.iter().filter(|c| w.has_capability(c)).count();
                    (overlap, w)
                })
                .filter(|(overlap, _)| *overlap > 0)
                .max_by_key(|(overlap, _)| *overlap);

            if let Some((_, worker)) = best {
                assignment.insert(task.id.as_str().to_string(), worker.id.clone());
            }
        }
        assignment
    }
}

#[cfg(test)]
#[path = "advisor_tests.rs"]
mod tests;
