// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker execution: runs one subtask end-to-end via a bound model provider.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use workforce_bus::hooks::{HookPipeline, ModelCallContext, ModelCallOutcome};
use workforce_core::id::TaskId;
use workforce_core::{AttemptRecord, Clock, Task, TaskResult, Worker, WorkflowMemoryEntry};
use workforce_providers::{ChatMessage, LlmProvider};

fn render_prompt(task: &Task) -> String {
    let mut prompt = format!(
        "Task: {}\nExpected output: {}\n",
        task.description, task.expected_output
    );
    for (key, value) in &task.context {
        prompt.push_str(&format!("{key}: {value}\n"));
    }
    prompt
}

/// Drives one worker through one subtask attempt. Stateless itself; the
/// caller owns the `Worker` (attempt history, workflow memory) across calls.
pub struct WorkerExecutor {
    hooks: Arc<HookPipeline>,
    clock: Arc<dyn Clock>,
}

impl WorkerExecutor {
    pub fn new(hooks: Arc<HookPipeline>, clock: Arc<dyn Clock>) -> Self {
        Self { hooks, clock }
    }

    /// Runs `task` on `worker` via `provider`. Never propagates a provider
    /// error: the outcome is always a `TaskResult`, and an attempt record is
    /// appended to the worker's history regardless of outcome.
    pub async fn process(
        &self,
        provider: &dyn LlmProvider,
        worker: &mut Worker,
        task: &Task,
        parent_content: Option<&str>,
        dependency_results: Option<&HashMap<TaskId, TaskResult>>,
        attempt_number: u32,
    ) -> TaskResult {
        let enriched = self.enrich_context(worker, task, parent_content, dependency_results);
        let ctx = ModelCallContext {
            agent_id: worker.id.clone(),
            task_id: task.id.clone(),
            messages: vec![ChatMessage::user(render_prompt(&enriched))],
            model: worker.role.clone(),
            iteration: attempt_number,
        };

        let started_ms = self.clock.now_ms();
        let result = if let Err(vetoing_hook) = self.hooks.check_before_model(&ctx) {
            let message = format!("vetoed by hook {vetoing_hook}");
            self.hooks.run_after_model(
                &ctx,
                &ModelCallOutcome {
                    duration_ms: 0,
                    prompt_tokens: 0,
                    completion_tokens: 0,
                    error: Some(message.clone()),
                },
            );
            TaskResult::failure(task.id.clone(), worker.id.clone(), message, 0, attempt_number)
        } else {
            match provider.complete(&ctx.messages).await {
                Ok(completion) => {
                    let duration_ms = (self.clock.now_ms() - started_ms).max(0) as u64;
                    self.hooks.run_after_model(
                        &ctx,
                        &ModelCallOutcome {
                            duration_ms,
                            prompt_tokens: completion.usage.prompt_tokens,
                            completion_tokens: completion.usage.completion_tokens,
                            error: None,
                        },
                    );
                    let result = TaskResult::success(
                        task.id.clone(),
                        worker.id.clone(),
                        serde_json::json!(completion.content),
                        duration_ms,
                        attempt_number,
                    );
                    worker.push_workflow_memory(WorkflowMemoryEntry {
                        task_id: task.id.clone(),
                        task_description: task.description.clone(),
                        result: result.output.clone(),
                        worker_id: worker.id.clone(),
                        timestamp_ms: self.clock.now_ms(),
                    });
                    result
                }
                Err(err) => {
                    let duration_ms = (self.clock.now_ms() - started_ms).max(0) as u64;
                    warn!(error = %err, task_id = %task.id, worker_id = %worker.id, "worker provider call failed");
                    self.hooks.run_after_model(
                        &ctx,
                        &ModelCallOutcome {
                            duration_ms,
                            prompt_tokens: 0,
                            completion_tokens: 0,
                            error: Some(err.to_string()),
                        },
                    );
                    TaskResult::failure(
                        task.id.clone(),
                        worker.id.clone(),
                        err.to_string(),
                        duration_ms,
                        attempt_number,
                    )
                }
            }
        };

        worker.record_attempt(AttemptRecord {
            task_id: result.task_id.clone(),
            success: result.success,
            error: result.error.clone(),
            duration_ms: result.duration_ms,
            timestamp_ms: self.clock.now_ms(),
        });
        result
    }

    fn enrich_context(
        &self,
        worker: &Worker,
        task: &Task,
        parent_content: Option<&str>,
        dependency_results: Option<&HashMap<TaskId, TaskResult>>,
    ) -> Task {
        let mut enriched = task.clone();
        if let Some(parent) = parent_content {
            enriched.set_context("parent_task", serde_json::json!(parent));
        }
        if let Some(deps) = dependency_results {
            let by_id: HashMap<String, &TaskResult> =
                deps.iter().map(|(id, result)| (id.as_str().to_string(), result)).collect();
            enriched.set_context("dependency_results", serde_json::json!(by_id));
        }
        if worker.workflow_memory.is_some() {
            let memory: Vec<serde_json::Value> = worker
                .workflow_memory_snapshot()
                .into_iter()
                .map(|e| {
                    serde_json::json!({
                        "task_id": e.task_id.as_str(),
                        "task_description": e.task_description,
                        "result": e.result,
                    })
                })
                .collect();
            enriched.set_context("workflow_memory", serde_json::json!(memory));
        }
        enriched
    }
}

#[cfg(test)]
#[path = "worker_exec_tests.rs"]
mod tests;
