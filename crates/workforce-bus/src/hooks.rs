// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook pipeline: before/after callbacks around model calls and tool calls.
//!
//! Before-hooks may veto a call by returning `false`; after-hooks always run,
//! including on veto, and see the veto recorded as an error. The four
//! well-known hooks at the bottom of this file are the only path by which
//! `activate_agent`/`deactivate_agent`/`activate_toolkit`/`deactivate_toolkit`
//! events are produced; components never publish them directly.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use workforce_core::id::{TaskId, WorkerId};
use workforce_providers::ChatMessage;

use crate::bus::EventBus;
use crate::event::{Event, WorkforceAction};

#[derive(Debug, Clone)]
pub struct ModelCallContext {
    pub agent_id: WorkerId,
    pub task_id: TaskId,
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub iteration: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ModelCallOutcome {
    pub duration_ms: u64,
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ToolCallContext {
    pub agent_id: WorkerId,
    pub task_id: TaskId,
    pub tool_name: String,
    pub tool_args: Value,
}

#[derive(Debug, Clone, Default)]
pub struct ToolCallOutcome {
    pub success: bool,
    pub duration_ms: u64,
    pub result: Value,
    pub error: Option<String>,
}

pub trait BeforeModelHook: Send + Sync {
    fn name(&self) -> &str;
    /// Returns `false` to veto the call.
    fn before_model_call(&self, ctx: &ModelCallContext) -> bool;
}

pub trait AfterModelHook: Send + Sync {
    fn after_model_call(&self, ctx: &ModelCallContext, outcome: &ModelCallOutcome);
}

pub trait BeforeToolHook: Send + Sync {
    fn name(&self) -> &str;
    fn before_tool_call(&self, ctx: &ToolCallContext) -> bool;
}

pub trait AfterToolHook: Send + Sync {
    fn after_tool_call(&self, ctx: &ToolCallContext, outcome: &ToolCallOutcome);
}

#[derive(Default)]
struct HookLists {
    before_model: Vec<Arc<dyn BeforeModelHook>>,
    after_model: Vec<Arc<dyn AfterModelHook>>,
    before_tool: Vec<Arc<dyn BeforeToolHook>>,
    after_tool: Vec<Arc<dyn AfterToolHook>>,
}

/// Two global ordered lists per phase x invocation kind, plus optional
/// per-agent lists consulted after the global ones.
#[derive(Default)]
pub struct HookPipeline {
    global: RwLock<HookLists>,
    per_agent: RwLock<HashMap<WorkerId, HookLists>>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_before_model(&self, hook: Arc<dyn BeforeModelHook>) {
        self.global.write().before_model.push(hook);
    }

    pub fn register_after_model(&self, hook: Arc<dyn AfterModelHook>) {
        self.global.write().after_model.push(hook);
    }

    pub fn register_before_tool(&self, hook: Arc<dyn BeforeToolHook>) {
        self.global.write().before_tool.push(hook);
    }

    pub fn register_after_tool(&self, hook: Arc<dyn AfterToolHook>) {
        self.global.write().after_tool.push(hook);
    }

    pub fn register_before_model_for_agent(&self, agent_id: WorkerId, hook: Arc<dyn BeforeModelHook>) {
        self.per_agent
            .write()
            .entry(agent_id)
            .or_default()
            .before_model
            .push(hook);
    }

    /// Runs before-model-call hooks in order: global list, then the agent's own
    /// list. Returns `Err(hook_name)` for the first hook that vetoes.
    pub fn check_before_model(&self, ctx: &ModelCallContext) -> Result<(), String> {
        let global = self.global.read();
        for hook in global.before_model.iter() {
            if !hook.before_model_call(ctx) {
                return Err(hook.name().to_string());
            }
        }
        drop(global);
        if let Some(agent_hooks) = self.per_agent.read().get(&ctx.agent_id) {
            for hook in agent_hooks.before_model.iter() {
                if !hook.before_model_call(ctx) {
                    return Err(hook.name().to_string());
                }
            }
        }
        Ok(())
    }

    pub fn run_after_model(&self, ctx: &ModelCallContext, outcome: &ModelCallOutcome) {
        let global = self.global.read();
        for hook in global.after_model.iter() {
            hook.after_model_call(ctx, outcome);
        }
    }

    pub fn check_before_tool(&self, ctx: &ToolCallContext) -> Result<(), String> {
        let global = self.global.read();
        for hook in global.before_tool.iter() {
            if !hook.before_tool_call(ctx) {
                return Err(hook.name().to_string());
            }
        }
        Ok(())
    }

    pub fn run_after_tool(&self, ctx: &ToolCallContext, outcome: &ToolCallOutcome) {
        let global = self.global.read();
        for hook in global.after_tool.iter() {
            hook.after_tool_call(ctx, outcome);
        }
    }
}

/// Publishes `AgentActivated`/`AgentDeactivated` on the model-call before/after
/// phases. Registered once at session start; never bypassed.
pub struct EventPublishingModelHook {
    bus: EventBus,
    now_ms: fn() -> i64,
}

impl EventPublishingModelHook {
    pub fn new(bus: EventBus, now_ms: fn() -> i64) -> Self {
        Self { bus, now_ms }
    }
}

impl BeforeModelHook for EventPublishingModelHook {
    fn name(&self) -> &str {
        "event-publishing-model-hook"
    }

    fn before_model_call(&self, ctx: &ModelCallContext) -> bool {
        self.bus.publish(
            Event::new(
                WorkforceAction::AgentActivated,
                serde_json::json!({ "state": "running", "agent_id": ctx.agent_id.as_str() }),
                (self.now_ms)(),
            )
            .with_task(ctx.task_id.clone())
            .with_agent(ctx.agent_id.clone()),
        );
        true
    }
}

impl AfterModelHook for EventPublishingModelHook {
    fn after_model_call(&self, ctx: &ModelCallContext, outcome: &ModelCallOutcome) {
        self.bus.publish(
            Event::new(
                WorkforceAction::AgentDeactivated,
                serde_json::json!({
                    "state": "completed",
                    "agent_id": ctx.agent_id.as_str(),
                    "tokens": outcome.prompt_tokens + outcome.completion_tokens,
                    "message": outcome.error,
                }),
                (self.now_ms)(),
            )
            .with_task(ctx.task_id.clone())
            .with_agent(ctx.agent_id.clone()),
        );
    }
}

/// Publishes `ToolkitActivated`/`ToolkitDeactivated` on the tool-call before/after
/// phases.
pub struct EventPublishingToolHook {
    bus: EventBus,
    now_ms: fn() -> i64,
}

impl EventPublishingToolHook {
    pub fn new(bus: EventBus, now_ms: fn() -> i64) -> Self {
        Self { bus, now_ms }
    }
}

impl BeforeToolHook for EventPublishingToolHook {
    fn name(&self) -> &str {
        "event-publishing-tool-hook"
    }

    fn before_tool_call(&self, ctx: &ToolCallContext) -> bool {
        self.bus.publish(
            Event::new(
                WorkforceAction::ToolkitActivated,
                serde_json::json!({ "toolkit_name": ctx.tool_name, "agent_id": ctx.agent_id.as_str() }),
                (self.now_ms)(),
            )
            .with_task(ctx.task_id.clone())
            .with_agent(ctx.agent_id.clone()),
        );
        true
    }
}

impl AfterToolHook for EventPublishingToolHook {
    fn after_tool_call(&self, ctx: &ToolCallContext, outcome: &ToolCallOutcome) {
        self.bus.publish(
            Event::new(
                WorkforceAction::ToolkitDeactivated,
                serde_json::json!({
                    "toolkit_name": ctx.tool_name,
                    "agent_id": ctx.agent_id.as_str(),
                    "message": outcome.error,
                }),
                (self.now_ms)(),
            )
            .with_task(ctx.task_id.clone())
            .with_agent(ctx.agent_id.clone()),
        );
    }
}

#[cfg(test)]
#[path = "hooks_tests.rs"]
mod tests;
