// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler: drives a subtask graph from assignment to terminal states under
//! a concurrency cap, invoking the recovery engine on failure.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex as AsyncMutex, Notify};
use tokio::task::JoinSet;
use tokio::time::{timeout, Duration};
use tracing::{info, warn};

use workforce_bus::event::{Event, WorkforceAction};
use workforce_bus::hooks::HookPipeline;
use workforce_bus::EventBus;
use workforce_core::id::{TaskId, WorkerId};
use workforce_core::{Clock, PlanAssignment, SubtaskGraph, SubtaskState, Task, TaskResult, Worker};
use workforce_providers::{ChatMessage, LlmProvider};

use crate::coordinator::Coordinator;
use crate::planner::Planner;
use crate::recovery::{RecoveryEngine, RecoveryOutcome};
use crate::worker_exec::WorkerExecutor;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub pool_size: usize,
    pub max_retries: u32,
    pub stop_grace_period_ms: u64,
    /// Runs `FailureAnalyzer::evaluate` on every successful subtask and,
    /// below `quality_threshold`, reworks it through the recovery engine as
    /// if it had failed. Off by default — a successful subtask is not
    /// reworked.
    pub quality_evaluation_enabled: bool,
    pub quality_threshold: u8,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            max_retries: 3,
            stop_grace_period_ms: 1000,
            quality_evaluation_enabled: false,
            quality_threshold: 70,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SchedulerOutcome {
    Completed { results: HashMap<TaskId, TaskResult> },
    Stuck { stuck_ids: Vec<TaskId> },
    Stopped { results: HashMap<TaskId, TaskResult> },
}

/// A worker bound for concurrent execution: a `tokio::sync::Mutex` so the
/// guard can be held across the provider call's suspension point.
pub type WorkerPool = HashMap<WorkerId, Arc<AsyncMutex<Worker>>>;

pub fn looks_like_simple_question(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return false;
    }
    const GREETINGS: &[&str] = &["hi", "hello", "hey", "thanks", "thank you"];
    let word_count = lower.split_whitespace().count();
    word_count <= 4 || GREETINGS.iter().any(|g| lower.starts_with(g))
}

/// Keyword match first; falls back to a short model call. Classifier errors
/// default to "complex" (the safe fallback that still decomposes).
pub async fn classify_simple_question(provider: &dyn LlmProvider, question: &str) -> bool {
    if looks_like_simple_question(question) {
        return true;
    }
    let prompt = format!(
        "Is the following answerable directly, with no need to break it into subtasks? \
         Answer with exactly one word, yes or no.\n\n{question}"
    );
    match provider.complete(&[ChatMessage::user(prompt)]).await {
        Ok(completion) => completion.content.trim().to_lowercase().starts_with("yes"),
        Err(_) => false,
    }
}

async fn snapshot_workers(workers: &WorkerPool) -> Vec<Worker> {
    let mut snapshot = Vec::with_capacity(workers.len());
    for handle in workers.values() {
        snapshot.push(handle.lock().await.clone());
    }
    snapshot
}

pub struct Scheduler {
    config: SchedulerConfig,
    bus: EventBus,
    clock: Arc<dyn Clock>,
    recovery: Arc<RecoveryEngine>,
    hooks: Arc<HookPipeline>,
}

impl Scheduler {
    pub fn new(
        config: SchedulerConfig,
        bus: EventBus,
        clock: Arc<dyn Clock>,
        recovery: Arc<RecoveryEngine>,
        hooks: Arc<HookPipeline>,
    ) -> Self {
        Self {
            config,
            bus,
            clock,
            recovery,
            hooks,
        }
    }

    /// Decomposes and assigns a root task, independent of starting execution
    /// so a client can review/edit the subtask list in between.
    pub async fn decompose_task(
        &self,
        planner: &dyn Planner,
        coordinator: &dyn Coordinator,
        root: &Task,
        workers: &[Worker],
    ) -> (SubtaskGraph, PlanAssignment) {
        let mut subtasks = planner.decompose(root, workers, None).await;
        let assignment_map = coordinator.assign(&mut subtasks, workers).await;

        let mut graph = SubtaskGraph::new();
        for subtask in subtasks {
            if let Err(err) = graph.insert(subtask) {
                warn!(error = %err, "dropping subtask that failed graph insertion");
            }
        }

        let mut assignment = PlanAssignment::new();
        for (task_id, worker_id) in assignment_map {
            assignment.assign(task_id, worker_id);
        }
        (graph, assignment)
    }

    fn publish_task_assigned(&self, task_id: &TaskId, worker_id: &WorkerId) {
        self.bus.publish(
            Event::new(
                WorkforceAction::TaskAssigned,
                serde_json::json!({ "assignee_id": worker_id.as_str(), "task_id": task_id.as_str() }),
                self.clock.now_ms(),
            )
            .with_task(task_id.clone())
            .with_agent(worker_id.clone()),
        );
    }

    fn publish_task_state(&self, task_id: &TaskId, state: &str, result: &TaskResult, failure_count: u32) {
        self.bus.publish(
            Event::new(
                WorkforceAction::TaskStateChanged,
                serde_json::json!({
                    "state": state,
                    "task_id": task_id.as_str(),
                    "result": result.output,
                    "failure_count": failure_count,
                }),
                self.clock.now_ms(),
            )
            .with_task(task_id.clone()),
        );
    }

    /// Applies the outcome of a recovery decision, whether it came from an
    /// actual failure or from a below-threshold quality evaluation.
    #[allow(clippy::too_many_arguments)]
    fn apply_recovery_outcome(
        &self,
        outcome: Option<RecoveryOutcome>,
        graph: &mut SubtaskGraph,
        workers: &mut WorkerPool,
        providers: &mut HashMap<WorkerId, Arc<dyn LlmProvider>>,
        assignment: &mut PlanAssignment,
        default_provider: &Arc<dyn LlmProvider>,
        task_id: &TaskId,
        result: &TaskResult,
        failure_count: u32,
    ) {
        match outcome {
            Some(RecoveryOutcome::Retried) => {
                let _ = graph.set_state(task_id, SubtaskState::Pending);
            }
            Some(RecoveryOutcome::Reassigned { worker_id }) => {
                assignment.assign(task_id.clone(), worker_id);
                let _ = graph.set_state(task_id, SubtaskState::Pending);
            }
            Some(RecoveryOutcome::Replanned { new_id }) => {
                if let Some(worker_id) = assignment.of(task_id).cloned() {
                    assignment.assign(new_id, worker_id);
                }
            }
            Some(RecoveryOutcome::Decomposed { new_ids }) => {
                if let Some(worker_id) = assignment.of(task_id).cloned() {
                    for new_id in new_ids {
                        assignment.assign(new_id, worker_id.clone());
                    }
                }
            }
            Some(RecoveryOutcome::WorkerCreated { worker }) => {
                let worker_id = worker.id.clone();
                workers.insert(worker_id.clone(), Arc::new(AsyncMutex::new(worker)));
                providers.insert(worker_id.clone(), default_provider.clone());
                assignment.assign(task_id.clone(), worker_id);
                let _ = graph.set_state(task_id, SubtaskState::Pending);
            }
            None => {
                let _ = graph.set_state(task_id, SubtaskState::Failed);
                self.publish_task_state(task_id, "FAILED", result, failure_count);
            }
        }
    }

    /// Drives `graph` to completion. `workers` and `providers` may grow during
    /// execution (CREATE_WORKER); `default_provider` backs newly synthesised
    /// workers. `stop` is signalled externally on a `stop` control action.
    #[allow(clippy::too_many_arguments)]
    pub async fn start_execution(
        &self,
        graph: &mut SubtaskGraph,
        workers: &mut WorkerPool,
        assignment: &mut PlanAssignment,
        providers: &mut HashMap<WorkerId, Arc<dyn LlmProvider>>,
        default_provider: Arc<dyn LlmProvider>,
        stop: Arc<Notify>,
    ) -> SchedulerOutcome {
        let mut results: HashMap<TaskId, TaskResult> = HashMap::new();
        let mut failure_counts: HashMap<TaskId, u32> = HashMap::new();
        let mut in_flight: JoinSet<(TaskId, TaskResult)> = JoinSet::new();
        let mut stopped = false;

        loop {
            if in_flight.is_empty() && graph.all_terminal() {
                break;
            }

            while in_flight.len() < self.config.pool_size {
                let Some(next_id) = graph.ready_ids().into_iter().next() else {
                    break;
                };
                let Some(worker_id) = assignment.of(&next_id).cloned() else {
                    break;
                };
                let Some(worker_handle) = workers.get(&worker_id).cloned() else {
                    break;
                };
                let Some(task) = graph.get(&next_id).cloned() else {
                    break;
                };
                let provider = providers
                    .get(&worker_id)
                    .cloned()
                    .unwrap_or_else(|| default_provider.clone());

                if graph.set_state(&next_id, SubtaskState::InFlight).is_err() {
                    break;
                }
                self.publish_task_assigned(&next_id, &worker_id);

                let attempt_number = failure_counts.get(&next_id).copied().unwrap_or(0) + 1;
                let executor = WorkerExecutor::new(self.hooks.clone(), self.clock.clone());
                in_flight.spawn(async move {
                    let mut guard = worker_handle.lock().await;
                    let result = executor
                        .process(provider.as_ref(), &mut guard, &task, None, None, attempt_number)
                        .await;
                    (task.id.clone(), result)
                });
            }

            if in_flight.is_empty() {
                let stuck: Vec<TaskId> = graph
                    .ids()
                    .filter(|id| !graph.state(id).map(SubtaskState::is_terminal).unwrap_or(true))
                    .cloned()
                    .collect();
                if stuck.is_empty() {
                    break;
                }
                warn!(stuck = ?stuck, "scheduler stuck: no subtask can progress");
                return SchedulerOutcome::Stuck { stuck_ids: stuck };
            }

            tokio::select! {
                biased;
                _ = stop.notified(), if !stopped => {
                    stopped = true;
                    info!("stop requested, draining in-flight subtasks");
                    let grace = Duration::from_millis(self.config.stop_grace_period_ms);
                    let _ = timeout(grace, async {
                        while in_flight.join_next().await.is_some() {}
                    })
                    .await;
                    return SchedulerOutcome::Stopped { results };
                }
                Some(joined) = in_flight.join_next() => {
                    let (task_id, result) = match joined {
                        Ok(pair) => pair,
                        Err(err) => {
                            warn!(error = %err, "in-flight subtask task panicked or was cancelled");
                            continue;
                        }
                    };
                    results.insert(task_id.clone(), result.clone());

                    if result.success {
                        let _ = graph.set_state(&task_id, SubtaskState::Done);
                        self.publish_task_state(&task_id, "DONE", &result, 0);

                        if self.config.quality_evaluation_enabled {
                            if let Some(task) = graph.get(&task_id).cloned() {
                                let evaluation = self.recovery.evaluate_quality(&task, &result).await;
                                if evaluation.quality_score < self.config.quality_threshold {
                                    let strategy = evaluation
                                        .suggested_strategy
                                        .unwrap_or(crate::recovery::RecoveryStrategy::Replan);
                                    let analysis = crate::recovery::FailureAnalysis {
                                        reasoning: "quality evaluation below threshold".to_string(),
                                        recovery_strategy: Some(strategy),
                                        modified_task_content: None,
                                        issues: evaluation.issues,
                                    };
                                    let mut degraded = result.clone();
                                    degraded.success = false;
                                    degraded.error = Some(format!(
                                        "quality score {} below threshold {}",
                                        evaluation.quality_score, self.config.quality_threshold
                                    ));

                                    let worker_snapshot = snapshot_workers(workers).await;
                                    let outcome = self
                                        .recovery
                                        .apply_strategy(graph, &task, strategy, &analysis, &degraded, &worker_snapshot)
                                        .await;
                                    self.apply_recovery_outcome(
                                        outcome, graph, workers, providers, assignment, &default_provider, &task_id,
                                        &degraded, 0,
                                    );
                                }
                            }
                        }
                        continue;
                    }

                    let count = {
                        let entry = failure_counts.entry(task_id.clone()).or_insert(0);
                        *entry += 1;
                        *entry
                    };

                    if count >= self.config.max_retries {
                        let _ = graph.set_state(&task_id, SubtaskState::Failed);
                        self.publish_task_state(&task_id, "FAILED", &result, count);
                        continue;
                    }

                    let worker_snapshot = snapshot_workers(workers).await;
                    let outcome = self.recovery.recover(graph, &task_id, &result, &worker_snapshot).await;
                    self.apply_recovery_outcome(
                        outcome, graph, workers, providers, assignment, &default_provider, &task_id, &result, count,
                    );
                }
            }
        }

        SchedulerOutcome::Completed { results }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
