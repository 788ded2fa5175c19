// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recovery engine: classifies subtask failures and applies exactly one of
//! five strategies against the subtask graph.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use workforce_core::id::{TaskId, WorkerId};
use workforce_core::{SubtaskGraph, SubtaskState, Task, TaskResult, Worker};
use workforce_providers::{ChatMessage, LlmProvider};

use crate::planner::Planner;
use crate::worker_factory::WorkerFactory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryStrategy {
    Retry,
    Reassign,
    Replan,
    Decompose,
    CreateWorker,
}

/// The model-produced (or provider-failure-defaulted) analysis of one failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FailureAnalysis {
    #[serde(default)]
    pub reasoning: String,
    pub recovery_strategy: Option<RecoveryStrategy>,
    pub modified_task_content: Option<String>,
    #[serde(default)]
    pub issues: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QualityEvaluation {
    pub quality_score: u8,
    pub issues: Vec<String>,
    pub suggested_strategy: Option<RecoveryStrategy>,
}

#[async_trait]
pub trait FailureAnalyzer: Send + Sync {
    async fn classify(&self, task: &Task, result: &TaskResult) -> FailureAnalysis;

    /// "Evaluate" mode: runs on a *successful* result to decide whether it is
    /// worth reworking anyway.
    async fn evaluate(&self, task: &Task, result: &TaskResult) -> QualityEvaluation;
}

fn classify_error_category(error: &str) -> &'static str {
    let lower = error.to_lowercase();
    if lower.contains("network") || lower.contains("timeout") || lower.contains("connection") {
        "network_error"
    } else if lower.contains("tool") {
        "tool_error"
    } else if lower.contains("parse") || lower.contains("malformed") {
        "parse_error"
    } else if lower.contains("capability") {
        "capability_missing"
    } else {
        "unclassified"
    }
}

fn static_strategy_for_category(category: &str) -> RecoveryStrategy {
    match category {
        "network_error" => RecoveryStrategy::Retry,
        "tool_error" => RecoveryStrategy::Reassign,
        "parse_error" => RecoveryStrategy::Replan,
        "capability_missing" => RecoveryStrategy::CreateWorker,
        _ => RecoveryStrategy::Replan,
    }
}

#[derive(Debug, Deserialize)]
struct RawEvaluation {
    quality_score: u8,
    #[serde(default)]
    issues: Vec<String>,
    suggested_strategy: Option<RecoveryStrategy>,
}

fn fallback_evaluation() -> QualityEvaluation {
    QualityEvaluation {
        quality_score: 100,
        issues: Vec::new(),
        suggested_strategy: None,
    }
}

/// The only concrete `FailureAnalyzer`: prompts a language-model provider,
/// parsing its JSON response. Provider errors or unparseable output degrade
/// to safe defaults (no suggested strategy; a perfect quality score) rather
/// than propagating.
pub struct LlmFailureAnalyzer {
    provider: Arc<dyn LlmProvider>,
}

impl LlmFailureAnalyzer {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl FailureAnalyzer for LlmFailureAnalyzer {
    async fn classify(&self, task: &Task, result: &TaskResult) -> FailureAnalysis {
        let prompt = format!(
            "A subtask failed.\nTask: {}\nError: {}\n\
             Respond with JSON: {{\"reasoning\": ..., \"recovery_strategy\"?: \
             \"RETRY\"|\"REASSIGN\"|\"REPLAN\"|\"DECOMPOSE\"|\"CREATE_WORKER\", \
             \"modified_task_content\"?: ..., \"issues\": [...]}}",
            task.description,
            result.error.as_deref().unwrap_or("unknown error")
        );
        let raw = match self.provider.complete(&[ChatMessage::user(prompt)]).await {
            Ok(completion) => completion.content,
            Err(err) => {
                warn!(error = %err, task_id = %task.id, "failure analyzer provider call failed, using static classification");
                return FailureAnalysis::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    async fn evaluate(&self, task: &Task, result: &TaskResult) -> QualityEvaluation {
        let prompt = format!(
            "Evaluate the quality of this completed subtask.\nTask: {}\nOutput: {}\n\
             Respond with JSON: {{\"quality_score\": 0-100, \"issues\": [...], \
             \"suggested_strategy\"?: \"RETRY\"|\"REASSIGN\"|\"REPLAN\"|\"DECOMPOSE\"|\"CREATE_WORKER\"}}",
            task.description, result.output
        );
        let raw = match self.provider.complete(&[ChatMessage::user(prompt)]).await {
            Ok(completion) => completion.content,
            Err(err) => {
                warn!(error = %err, task_id = %task.id, "quality evaluator provider call failed, assuming acceptable quality");
                return fallback_evaluation();
            }
        };
        serde_json::from_str::<RawEvaluation>(&raw)
            .map(|r| QualityEvaluation {
                quality_score: r.quality_score,
                issues: r.issues,
                suggested_strategy: r.suggested_strategy,
            })
            .unwrap_or_else(|_| fallback_evaluation())
    }
}

/// What applying a strategy did to the graph / worker pool. The caller
/// (scheduler) is responsible for acting on the variant: re-dispatching on
/// `Retried`, updating the plan assignment on `Reassigned`, adding the new
/// worker to the pool on `WorkerCreated`, and dispatching the new subtask ids
/// on `Replanned`/`Decomposed`.
#[derive(Debug, Clone)]
pub enum RecoveryOutcome {
    Retried,
    Reassigned { worker_id: WorkerId },
    Replanned { new_id: TaskId },
    Decomposed { new_ids: Vec<TaskId> },
    WorkerCreated { worker: Worker },
}

pub struct RecoveryEngine {
    analyzer: Arc<dyn FailureAnalyzer>,
    planner: Arc<dyn Planner>,
    worker_factory: Arc<dyn WorkerFactory>,
    honor_llm_strategy: bool,
}

impl RecoveryEngine {
    pub fn new(
        analyzer: Arc<dyn FailureAnalyzer>,
        planner: Arc<dyn Planner>,
        worker_factory: Arc<dyn WorkerFactory>,
    ) -> Self {
        Self {
            analyzer,
            planner,
            worker_factory,
            honor_llm_strategy: true,
        }
    }

    pub fn with_honor_llm_strategy(mut self, honor: bool) -> Self {
        self.honor_llm_strategy = honor;
        self
    }

    pub async fn evaluate_quality(&self, task: &Task, result: &TaskResult) -> QualityEvaluation {
        self.analyzer.evaluate(task, result).await
    }

    /// Classifies `failed_id`'s failure and applies exactly one strategy.
    /// Returns `None` if the task is unknown to the graph, or the chosen
    /// strategy cannot be applied (the scheduler then marks it FAILED).
    pub async fn recover(
        &self,
        graph: &mut SubtaskGraph,
        failed_id: &TaskId,
        result: &TaskResult,
        workers: &[Worker],
    ) -> Option<RecoveryOutcome> {
        let task = graph.get(failed_id)?.clone();
        let analysis = self.analyzer.classify(&task, result).await;

        let strategy = match (self.honor_llm_strategy, analysis.recovery_strategy) {
            (true, Some(strategy)) => strategy,
            _ => static_strategy_for_category(classify_error_category(
                result.error.as_deref().unwrap_or(""),
            )),
        };

        self.apply_strategy(graph, &task, strategy, &analysis, result, workers).await
    }

    /// Applies a strategy decided elsewhere (classification already done),
    /// used by the scheduler's quality-evaluation rework path, which has only
    /// a `RecoveryStrategy` suggestion, not a fresh `FailureAnalysis`.
    pub async fn apply_strategy(
        &self,
        graph: &mut SubtaskGraph,
        task: &Task,
        strategy: RecoveryStrategy,
        analysis: &FailureAnalysis,
        result: &TaskResult,
        workers: &[Worker],
    ) -> Option<RecoveryOutcome> {
        match strategy {
            RecoveryStrategy::Retry => Some(RecoveryOutcome::Retried),
            RecoveryStrategy::Reassign => {
                let alternative = workers.iter().find(|w| w.id != result.worker_id)?;
                Some(RecoveryOutcome::Reassigned {
                    worker_id: alternative.id.clone(),
                })
            }
            RecoveryStrategy::Replan => self
                .apply_replan(graph, task, analysis)
                .map(|new_id| RecoveryOutcome::Replanned { new_id }),
            RecoveryStrategy::Decompose => self
                .apply_decompose(graph, task, workers)
                .await
                .map(|new_ids| RecoveryOutcome::Decomposed { new_ids }),
            RecoveryStrategy::CreateWorker => {
                let required = required_capabilities(task);
                let worker = self.worker_factory.create_worker(&required);
                Some(RecoveryOutcome::WorkerCreated { worker })
            }
        }
    }

    fn apply_replan(
        &self,
        graph: &mut SubtaskGraph,
        task: &Task,
        analysis: &FailureAnalysis,
    ) -> Option<TaskId> {
        let new_id = TaskId::new(format!("{}_replanned", task.id.as_str()));
        if graph.get(&new_id).is_some() {
            return None;
        }
        let description = analysis
            .modified_task_content
            .clone()
            .unwrap_or_else(|| format!("{} (revised after failure)", task.description));
        let new_task = Task::new(new_id.clone(), description)
            .with_expected_output(task.expected_output.clone())
            .with_dependencies(task.dependencies.clone());

        graph.set_state(&task.id, SubtaskState::Abandoned).ok()?;
        graph.insert(new_task).ok()?;
        graph.rewire_dependents(&task.id, std::slice::from_ref(&new_id));
        Some(new_id)
    }

    async fn apply_decompose(
        &self,
        graph: &mut SubtaskGraph,
        task: &Task,
        workers: &[Worker],
    ) -> Option<Vec<TaskId>> {
        let subtasks = self
            .planner
            .decompose(
                task,
                workers,
                Some("This task failed; decompose it into smaller, more specific subtasks."),
            )
            .await;
        if subtasks.len() <= 1 {
            return None;
        }

        graph.set_state(&task.id, SubtaskState::Abandoned).ok()?;

        let mut new_ids = Vec::with_capacity(subtasks.len());
        for mut subtask in subtasks {
            if subtask.dependencies.is_empty() {
                subtask.dependencies = task.dependencies.clone();
            }
            let id = subtask.id.clone();
            graph.insert(subtask).ok()?;
            new_ids.push(id);
        }

        // Leaves of the new batch (nothing else in the batch depends on them)
        // inherit the original's dependents.
        let terminal_new_ids: Vec<TaskId> = new_ids
            .iter()
            .filter(|id| {
                new_ids.iter().all(|other| {
                    graph
                        .get(other)
                        .map(|t| !t.dependencies.contains(id))
                        .unwrap_or(true)
                })
            })
            .cloned()
            .collect();
        graph.rewire_dependents(&task.id, &terminal_new_ids);
        Some(new_ids)
    }
}

fn required_capabilities(task: &Task) -> Vec<String> {
    task.context
        .get("required_capabilities")
        .and_then(|v| v.as_array())
        .map(|arr| arr.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
