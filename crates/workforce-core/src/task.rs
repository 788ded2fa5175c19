// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task and subtask-graph types.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::id::TaskId;

/// A unit of work: the root task submitted by a client, or a subtask produced
/// by the planner or the recovery engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub description: String,
    pub expected_output: String,
    /// Ordered set of task ids that must reach DONE before this task may start.
    pub dependencies: Vec<TaskId>,
    /// Arbitrary injected inputs (parent output, dependency results, workflow memory, ...).
    #[serde(default)]
    pub context: HashMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            expected_output: String::new(),
            dependencies: Vec::new(),
            context: HashMap::new(),
        }
    }

    pub fn with_expected_output(mut self, expected_output: impl Into<String>) -> Self {
        self.expected_output = expected_output.into();
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<TaskId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn set_context(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.context.insert(key.into(), value);
    }
}

/// Per-subtask lifecycle state, driven by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubtaskState {
    Pending,
    Ready,
    InFlight,
    Done,
    Failed,
    Abandoned,
}

impl SubtaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed | Self::Abandoned)
    }
}

/// Errors returned when mutating a `SubtaskGraph` would break one of its invariants.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("task id {0} already exists in the graph")]
    DuplicateId(String),
    #[error("task {0} depends on unknown task id {1}")]
    UnknownDependency(String, String),
    #[error("adding task {0} would introduce a cycle")]
    WouldCycle(String),
    #[error("unknown task id {0}")]
    UnknownTask(String),
    #[error("task {0} cannot be removed: not pending, or other tasks depend on it")]
    NotRemovable(String),
}

/// The set of subtasks derived from a root task, together with their dependency
/// relation. Invariant: acyclic at all times.
#[derive(Debug, Default)]
pub struct SubtaskGraph {
    tasks: HashMap<TaskId, Task>,
    states: HashMap<TaskId, SubtaskState>,
    order: Vec<TaskId>,
}

impl SubtaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a task, rejecting duplicate ids, dangling dependencies, or cycles.
    pub fn insert(&mut self, task: Task) -> Result<(), GraphError> {
        if self.tasks.contains_key(&task.id) {
            return Err(GraphError::DuplicateId(task.id.as_str().to_string()));
        }
        for dep in &task.dependencies {
            if !self.tasks.contains_key(dep) {
                return Err(GraphError::UnknownDependency(
                    task.id.as_str().to_string(),
                    dep.as_str().to_string(),
                ));
            }
        }
        let id = task.id.clone();
        self.order.push(id.clone());
        self.tasks.insert(id.clone(), task);
        self.states.insert(id, SubtaskState::Pending);
        if self.has_cycle() {
            let bad_id = id.clone();
            self.remove(&bad_id);
            return Err(GraphError::WouldCycle(bad_id.as_str().to_string()));
        }
        Ok(())
    }

    fn remove(&mut self, id: &TaskId) {
        self.tasks.remove(id);
        self.states.remove(id);
        self.order.retain(|t| t != id);
    }

    /// Removes a task a client has asked to drop before execution claimed
    /// it. Rejects anything already in flight or terminal, and anything
    /// still depended on, rather than silently corrupting the graph.
    pub fn remove_pending(&mut self, id: &TaskId) -> Result<(), GraphError> {
        if self.state(id) != Some(SubtaskState::Pending) {
            return Err(GraphError::NotRemovable(id.as_str().to_string()));
        }
        if !self.dependents_of(id).is_empty() {
            return Err(GraphError::NotRemovable(id.as_str().to_string()));
        }
        self.remove(id);
        Ok(())
    }

    fn has_cycle(&self) -> bool {
        let mut visited: HashSet<TaskId> = HashSet::new();
        let mut stack: HashSet<TaskId> = HashSet::new();

        fn visit(
            id: &TaskId,
            tasks: &HashMap<TaskId, Task>,
            visited: &mut HashSet<TaskId>,
            stack: &mut HashSet<TaskId>,
        ) -> bool {
            if stack.contains(id) {
                return true;
            }
            if visited.contains(id) {
                return false;
            }
            visited.insert(id.clone());
            stack.insert(id.clone());
            if let Some(task) = tasks.get(id) {
                for dep in &task.dependencies {
                    if visit(dep, tasks, visited, stack) {
                        return true;
                    }
                }
            }
            stack.remove(id);
            false
        }

        for id in self.tasks.keys() {
            if visit(id, &self.tasks, &mut visited, &mut stack) {
                return true;
            }
        }
        false
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.get_mut(id)
    }

    pub fn state(&self, id: &TaskId) -> Option<SubtaskState> {
        self.states.get(id).copied()
    }

    pub fn set_state(&mut self, id: &TaskId, state: SubtaskState) -> Result<(), GraphError> {
        if !self.tasks.contains_key(id) {
            return Err(GraphError::UnknownTask(id.as_str().to_string()));
        }
        self.states.insert(id.clone(), state);
        Ok(())
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &TaskId> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All ids whose dependencies are every one DONE (or themselves ABANDONED with
    /// a captured partial result, which the scheduler marks DONE for readiness purposes).
    pub fn ready_ids(&self) -> Vec<TaskId> {
        self.order
            .iter()
            .filter(|id| self.states.get(*id) == Some(&SubtaskState::Pending))
            .filter(|id| {
                self.tasks
                    .get(*id)
                    .map(|t| {
                        t.dependencies
                            .iter()
                            .all(|dep| matches!(self.states.get(dep), Some(SubtaskState::Done)))
                    })
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    pub fn all_terminal(&self) -> bool {
        self.states.values().all(|s| s.is_terminal())
    }

    /// Ids of tasks that list `id` as a dependency.
    pub fn dependents_of(&self, id: &TaskId) -> Vec<TaskId> {
        self.order
            .iter()
            .filter(|other| {
                self.tasks
                    .get(*other)
                    .map(|t| t.dependencies.contains(id))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Rewrites every dependent of `old_id` to depend on `new_ids` instead, used by
    /// REPLAN and DECOMPOSE to splice a replacement into the dependency relation.
    pub fn rewire_dependents(&mut self, old_id: &TaskId, new_ids: &[TaskId]) {
        for task in self.tasks.values_mut() {
            if task.dependencies.contains(old_id) {
                task.dependencies.retain(|d| d != old_id);
                for new_id in new_ids {
                    if !task.dependencies.contains(new_id) {
                        task.dependencies.push(new_id.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
