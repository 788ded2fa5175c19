// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Planner: decomposes a root task into self-contained subtasks.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use workforce_core::id::TaskId;
use workforce_core::{Task, TaskResult, Worker};
use workforce_providers::{ChatMessage, LlmProvider};

use crate::xml_parse::parse_subtasks_xml;

/// `decompose_structured`'s response shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubtaskDefinition {
    pub description: String,
    pub expected_output: String,
    pub dependencies: Vec<String>,
    pub priority: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecompositionResult {
    pub subtasks: Vec<SubtaskDefinition>,
    pub reasoning: String,
    /// True iff every returned subtask has an empty dependency list.
    pub can_parallelize: bool,
}

/// Invoked in-order as subtasks are produced, so a UI can render decomposition
/// incrementally.
pub type BatchCallback<'a> = &'a (dyn Fn(&[Task]) + Send + Sync);
pub type TextCallback<'a> = &'a (dyn Fn(&str) + Send + Sync);

#[async_trait]
pub trait Planner: Send + Sync {
    async fn decompose(
        &self,
        task: &Task,
        workers: &[Worker],
        extra_context: Option<&str>,
    ) -> Vec<Task> {
        self.decompose_with_callbacks(task, workers, extra_context, None, None)
            .await
    }

    async fn decompose_with_callbacks(
        &self,
        task: &Task,
        workers: &[Worker],
        extra_context: Option<&str>,
        on_batch: Option<BatchCallback<'_>>,
        on_text: Option<TextCallback<'_>>,
    ) -> Vec<Task>;

    async fn decompose_structured(
        &self,
        task: &Task,
        workers: &[Worker],
        extra_context: Option<&str>,
    ) -> DecompositionResult;

    /// Folds successful subtask results into the parent's final output. Failed
    /// subtasks are excluded; at least one success is required to report the
    /// overall task successful.
    fn compose(&self, parent: &Task, subtask_results: &[TaskResult]) -> Option<String>;
}

fn worker_blurbs(workers: &[Worker]) -> String {
    workers
        .iter()
        .map(|w| format!("- {} ({}): {}", w.id, w.role, w.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn decomposition_prompt(task: &Task, workers: &[Worker], extra_context: Option<&str>) -> String {
    let mut prompt = String::new();
    if let Some(ctx) = extra_context {
        prompt.push_str(ctx);
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "Decompose the following task into self-contained subtasks.\n\
         Task: {}\n\nAvailable workers:\n{}\n\n\
         Respond with <tasks><task>...</task>...</tasks>, one <task> per subtask, \
         each self-contained and listing its dependencies.",
        task.description,
        worker_blurbs(workers)
    ));
    prompt
}

fn single_subtask_fallback(task: &Task) -> Vec<Task> {
    vec![Task::new(task.id.clone(), task.description.clone())
        .with_expected_output(task.expected_output.clone())]
}

fn build_subtasks(parent_id: &TaskId, parsed: Vec<crate::xml_parse::ParsedSubtask>) -> Vec<Task> {
    let mut id_by_index = Vec::with_capacity(parsed.len());
    for i in 0..parsed.len() {
        id_by_index.push(TaskId::new(format!("{}_subtask_{}", parent_id.as_str(), i + 1)));
    }
    parsed
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            let dependencies = p
                .dependencies
                .iter()
                .filter_map(|dep_ref| {
                    // Accept either a 1-based index into the returned list or a
                    // literal id that happens to already be in `id_by_index`.
                    dep_ref
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| n.checked_sub(1))
                        .and_then(|idx| id_by_index.get(idx).cloned())
                        .or_else(|| id_by_index.iter().find(|id| id.as_str() == dep_ref).cloned())
                })
                .collect();
            Task::new(id_by_index[i].clone(), p.description)
                .with_expected_output(p.expected_output)
                .with_dependencies(dependencies)
        })
        .collect()
}

/// The only concrete `Planner`: prompts a language-model provider and parses
/// its XML-like response through the three-tier defensive parser.
pub struct LlmPlanner {
    provider: Arc<dyn LlmProvider>,
}

impl LlmPlanner {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    async fn request_decomposition(
        &self,
        task: &Task,
        workers: &[Worker],
        extra_context: Option<&str>,
    ) -> Option<String> {
        let prompt = decomposition_prompt(task, workers, extra_context);
        match self
            .provider
            .complete(&[ChatMessage::user(prompt)])
            .await
        {
            Ok(completion) => Some(completion.content),
            Err(err) => {
                warn!(error = %err, task_id = %task.id, "planner provider call failed, using fallback");
                None
            }
        }
    }
}

#[async_trait]
impl Planner for LlmPlanner {
    async fn decompose_with_callbacks(
        &self,
        task: &Task,
        workers: &[Worker],
        extra_context: Option<&str>,
        on_batch: Option<BatchCallback<'_>>,
        on_text: Option<TextCallback<'_>>,
    ) -> Vec<Task> {
        let Some(raw) = self.request_decomposition(task, workers, extra_context).await else {
            return single_subtask_fallback(task);
        };
        if let Some(cb) = on_text {
            cb(&raw);
        }

        let parsed = parse_subtasks_xml(&raw);
        let subtasks = if parsed.is_empty() {
            info!(task_id = %task.id, "planner could not parse any subtasks, falling back");
            single_subtask_fallback(task)
        } else {
            build_subtasks(&task.id, parsed)
        };

        if let Some(cb) = on_batch {
            cb(&subtasks);
        }
        subtasks
    }

    async fn decompose_structured(
        &self,
        task: &Task,
        workers: &[Worker],
        extra_context: Option<&str>,
    ) -> DecompositionResult {
        let Some(raw) = self.request_decomposition(task, workers, extra_context).await else {
            return DecompositionResult {
                subtasks: vec![SubtaskDefinition {
                    description: task.description.clone(),
                    expected_output: task.expected_output.clone(),
                    dependencies: Vec::new(),
                    priority: 0,
                }],
                reasoning: "provider unavailable, returning original task".to_string(),
                can_parallelize: true,
            };
        };

        let parsed = parse_subtasks_xml(&raw);
        let subtasks: Vec<SubtaskDefinition> = if parsed.is_empty() {
            vec![SubtaskDefinition {
                description: task.description.clone(),
                expected_output: task.expected_output.clone(),
                dependencies: Vec::new(),
                priority: 0,
            }]
        } else {
            parsed
                .into_iter()
                .map(|p| SubtaskDefinition {
                    description: p.description,
                    expected_output: p.expected_output,
                    dependencies: p.dependencies,
                    priority: p.priority,
                })
                .collect()
        };

        let can_parallelize = subtasks.iter().all(|s| s.dependencies.is_empty());
        DecompositionResult {
            subtasks,
            reasoning: String::new(),
            can_parallelize,
        }
    }

    fn compose(&self, _parent: &Task, subtask_results: &[TaskResult]) -> Option<String> {
        let successes: Vec<&TaskResult> = subtask_results.iter().filter(|r| r.success).collect();
        if successes.is_empty() {
            return None;
        }
        Some(
            successes
                .iter()
                .map(|r| r.output.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;
