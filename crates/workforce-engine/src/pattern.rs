// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaboration pattern: the pluggable top-level interface a session drives.
//! `Workforce` is the one pattern implemented here; master-slave, reflection,
//! debate, and role-playing patterns share the same interface but are out of
//! scope.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex as AsyncMutex, Notify};
use tracing::info;

use workforce_bus::event::{Event, WorkforceAction};
use workforce_bus::EventBus;
use workforce_core::id::WorkerId;
use workforce_core::{Clock, Task, TaskId, TaskResult, Worker};
use workforce_providers::LlmProvider;

use crate::coordinator::Coordinator;
use crate::planner::Planner;
use crate::scheduler::{classify_simple_question, Scheduler, SchedulerOutcome, WorkerPool};

#[async_trait]
pub trait CollaborationPattern: Send + Sync {
    async fn execute(&self, task: &Task) -> TaskResult;
}

/// The coordinator-planner-worker-scheduler loop, holding the worker roster
/// and model-provider bindings across calls to `execute` the way a session
/// owns its `CollaborationContext`.
pub struct Workforce {
    planner: Arc<dyn Planner>,
    coordinator: Arc<dyn Coordinator>,
    scheduler: Scheduler,
    bus: EventBus,
    clock: Arc<dyn Clock>,
    workers: WorkerPool,
    worker_providers: HashMap<WorkerId, Arc<dyn LlmProvider>>,
    default_provider: Arc<dyn LlmProvider>,
    stop: Arc<Notify>,
}

/// The result of classifying and, if warranted, decomposing a root task:
/// either a direct answer, or a graph ready for `run_graph` once a caller
/// has had a chance to review/edit it.
pub enum ExecutionPlan {
    Simple(TaskResult),
    Decomposed {
        graph: workforce_core::SubtaskGraph,
        assignment: workforce_core::PlanAssignment,
    },
}

impl Workforce {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        planner: Arc<dyn Planner>,
        coordinator: Arc<dyn Coordinator>,
        scheduler: Scheduler,
        bus: EventBus,
        clock: Arc<dyn Clock>,
        workers: Vec<Worker>,
        worker_providers: HashMap<WorkerId, Arc<dyn LlmProvider>>,
        default_provider: Arc<dyn LlmProvider>,
        stop: Arc<Notify>,
    ) -> Self {
        let pool = workers
            .into_iter()
            .map(|w| (w.id.clone(), Arc::new(AsyncMutex::new(w))))
            .collect();
        Self {
            planner,
            coordinator,
            scheduler,
            bus,
            clock,
            workers: pool,
            worker_providers,
            default_provider,
            stop,
        }
    }

    async fn roster_snapshot(&self) -> Vec<Worker> {
        let mut roster = Vec::with_capacity(self.workers.len());
        for handle in self.workers.values() {
            roster.push(handle.lock().await.clone());
        }
        roster
    }

    fn publish(&self, action: WorkforceAction, data: serde_json::Value) {
        self.bus.publish(Event::new(action, data, self.clock.now_ms()));
    }
}

#[async_trait]
impl CollaborationPattern for Workforce {
    /// Runs the simple-question fast path or the full decompose-assign-execute
    /// loop, publishing the same `confirmed` / terminal events either way so a
    /// client streaming the bus cannot tell which path was taken except by the
    /// presence (or absence) of `wait_confirm`/`task_decomposed`.
    async fn execute(&self, task: &Task) -> TaskResult {
        match self.plan(task).await {
            ExecutionPlan::Simple(result) => result,
            ExecutionPlan::Decomposed { graph, assignment } => self.run_graph(task, graph, assignment).await,
        }
    }
}

impl Workforce {
    /// Classifies `task` and, for anything beyond a direct answer, decomposes
    /// and assigns it without starting execution — the split a caller needs
    /// to let a client review or edit the subtask list before committing to
    /// `run_graph`.
    pub async fn plan(&self, task: &Task) -> ExecutionPlan {
        self.publish(
            WorkforceAction::Confirmed,
            serde_json::json!({ "question": task.description }),
        );

        if classify_simple_question(self.default_provider.as_ref(), &task.description).await {
            return ExecutionPlan::Simple(self.execute_simple(task).await);
        }

        let roster = self.roster_snapshot().await;
        let (graph, assignment) = self
            .scheduler
            .decompose_task(self.planner.as_ref(), self.coordinator.as_ref(), task, &roster)
            .await;

        self.publish(
            WorkforceAction::TaskDecomposed,
            serde_json::json!({ "subtask_count": graph.len() }),
        );
        self.publish(
            WorkforceAction::SubtasksReady,
            serde_json::json!({ "task_ids": graph.ids().map(TaskId::as_str).collect::<Vec<_>>() }),
        );

        ExecutionPlan::Decomposed { graph, assignment }
    }

    async fn execute_simple(&self, task: &Task) -> TaskResult {
        let started_ms = self.clock.now_ms();
        let messages = [workforce_providers::ChatMessage::user(task.description.clone())];
        let result = match self.default_provider.complete(&messages).await {
            Ok(completion) => {
                self.publish(
                    WorkforceAction::WaitConfirm,
                    serde_json::json!({ "content": completion.content, "question": task.description }),
                );
                let duration_ms = (self.clock.now_ms() - started_ms).max(0) as u64;
                TaskResult::success(
                    task.id.clone(),
                    WorkerId::new("direct-response"),
                    serde_json::json!(completion.content),
                    duration_ms,
                    1,
                )
            }
            Err(err) => {
                let duration_ms = (self.clock.now_ms() - started_ms).max(0) as u64;
                TaskResult::failure(
                    task.id.clone(),
                    WorkerId::new("direct-response"),
                    err.to_string(),
                    duration_ms,
                    1,
                )
            }
        };

        self.publish(
            WorkforceAction::SessionEnded,
            serde_json::json!({ "summary": result.output }),
        );
        result
    }

    /// Drives a previously planned graph to completion, using this
    /// `Workforce`'s own stop signal so an externally-triggered soft stop
    /// reaches the in-flight subtasks.
    pub async fn run_graph(
        &self,
        task: &Task,
        mut graph: workforce_core::SubtaskGraph,
        mut assignment: workforce_core::PlanAssignment,
    ) -> TaskResult {
        if graph.is_empty() {
            let result = TaskResult::failure(task.id.clone(), WorkerId::new("scheduler"), "planner produced no subtasks", 0, 1);
            self.publish(WorkforceAction::SessionEnded, serde_json::json!({ "summary": "no subtasks produced" }));
            return result;
        }

        let mut providers = self.worker_providers.clone();
        let mut workers = self.workers.clone();
        let outcome = self
            .scheduler
            .start_execution(
                &mut graph,
                &mut workers,
                &mut assignment,
                &mut providers,
                self.default_provider.clone(),
                self.stop.clone(),
            )
            .await;

        let subtask_results: Vec<TaskResult> = match &outcome {
            SchedulerOutcome::Completed { results } | SchedulerOutcome::Stopped { results } => {
                results.values().cloned().collect()
            }
            SchedulerOutcome::Stuck { stuck_ids } => {
                info!(stuck = ?stuck_ids, "workforce execution stuck, composing from partial results");
                Vec::new()
            }
        };

        let composed = self.planner.compose(task, &subtask_results);
        let result = match composed {
            Some(summary) => TaskResult::success(task.id.clone(), WorkerId::new("scheduler"), serde_json::json!(summary), 0, 1),
            None => TaskResult::failure(task.id.clone(), WorkerId::new("scheduler"), "no subtask succeeded", 0, 1),
        };

        self.publish(
            WorkforceAction::SessionEnded,
            serde_json::json!({ "summary": result.output }),
        );
        result
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
