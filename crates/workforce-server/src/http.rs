// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A handful of real endpoints driving the chat/task lifecycle, plus
//! compatibility stubs for the outer surfaces (auth, user profile, provider
//! list, MCP, OAuth) that a real frontend expects to exist but this crate
//! does not implement.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::body::{Body, Bytes};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::Notify;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use workforce_bus::event::{Event, WorkforceAction};
use workforce_bus::hooks::{EventPublishingModelHook, EventPublishingToolHook, HookPipeline};
use workforce_bus::EventBus;
use workforce_core::id::SessionId;
use workforce_core::{Clock, PlanAssignment, SubtaskGraph, Task, TaskId, Worker};
use workforce_engine::{ExecutionPlan, Scheduler};
use workforce_tasklock::{Action, ActionRecord, TaskLockStatus};

use crate::error::ApiError;
use crate::sse::SseAdapter;
use crate::state::{AppState, ProjectSession};

/// Wall-clock time as a bare function pointer: `EventPublishingModelHook` and
/// `EventPublishingToolHook` take `fn() -> i64` rather than a boxed closure,
/// so a time source bound to `AppState.clock` cannot be passed directly.
fn system_now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// `POST /chat` request body. Most model-connection fields are accepted and
/// ignored by the default provider factory and exist so real deployments
/// can route them to their own `ProviderFactory`.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub project_id: String,
    #[serde(default)]
    pub task_id: Option<String>,
    pub question: String,
    #[serde(default)]
    pub new_agents: Vec<String>,
    #[serde(flatten)]
    pub extra: Value,
}

#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct TaskUpdateRequest {
    pub task: Value,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(start_chat))
        .route("/chat/:project_id", post(supplement_chat))
        .route("/chat/:project_id/skip-task", delete(skip_task))
        .route("/task/:project_id", put(update_task))
        .route("/task/:project_id/start", post(start_task))
        .route("/user", get(stub_object))
        .route("/providers", get(stub_array))
        .route("/mcp", get(stub_array))
        .route("/config", get(stub_object))
        .route("/oauth/callback", get(stub_object))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "workforce-server" }))
}

async fn stub_object() -> Json<Value> {
    Json(json!({}))
}

async fn stub_array() -> Json<Value> {
    Json(json!([]))
}

/// Builds the workers for a new project from `new_agents`, defaulting to a
/// single generalist when the caller names none.
fn build_workers(new_agents: &[String]) -> Vec<Worker> {
    if new_agents.is_empty() {
        vec![Worker::new(workforce_core::id::WorkerId::new("w-1"), "generalist")]
    } else {
        new_agents
            .iter()
            .enumerate()
            .map(|(i, role)| Worker::new(workforce_core::id::WorkerId::new(format!("w-{i}")), role.clone()))
            .collect()
    }
}

/// Applies one `update_task` payload — `{"add": [{"id", "description"}],
/// "remove": [id, ...]}` — to a graph that has been decomposed but not yet
/// started. Ids that do not round-trip cleanly (duplicates, dangling
/// dependents, already in-flight) are silently skipped rather than failing
/// the whole batch, matching `SubtaskGraph::insert`/`remove_pending`'s own
/// reject-and-continue contract.
fn apply_task_update(
    graph: &mut SubtaskGraph,
    assignment: &mut PlanAssignment,
    workers: &[Worker],
    bus: &EventBus,
    now: i64,
    update: &Value,
) {
    for id in update.get("remove").and_then(Value::as_array).into_iter().flatten() {
        let Some(id) = id.as_str() else { continue };
        let task_id = TaskId::new(id);
        if graph.remove_pending(&task_id).is_ok() {
            bus.publish(Event::new(WorkforceAction::TaskRemoved, json!({ "task_id": id }), now).with_task(task_id));
        }
    }

    for item in update.get("add").and_then(Value::as_array).into_iter().flatten() {
        let (Some(id), Some(description)) = (
            item.get("id").and_then(Value::as_str),
            item.get("description").and_then(Value::as_str),
        ) else {
            continue;
        };
        let task_id = TaskId::new(id);
        if graph.insert(Task::new(task_id.clone(), description.to_string())).is_err() {
            continue;
        }
        if let Some(worker) = workers.first() {
            assignment.assign(task_id.clone(), worker.id.clone());
        }
        bus.publish(Event::new(WorkforceAction::TaskAdded, json!({ "task_id": id }), now).with_task(task_id));
    }
}

/// `POST /chat`: starts a project and streams the session's events back as
/// `text/event-stream`. The response body is built directly from raw frame
/// text (not axum's `sse::Event` wrapper) so the bytes on the wire match
/// `WireFrame::to_sse_text()` exactly.
///
/// A direct answer runs to completion immediately. A decomposed plan instead
/// publishes `task_decomposed`/`subtasks_ready` and then blocks until the
/// client confirms via `POST /task/{project_id}/start` — applying any
/// `PUT /task/{project_id}` edits queued in the meantime — before dispatching
/// any subtask.
async fn start_chat(State(state): State<Arc<AppState>>, Json(req): Json<ChatRequest>) -> Result<Response, ApiError> {
    if req.question.trim().is_empty() {
        return Err(ApiError::BadRequest("question must not be empty".into()));
    }

    let project_id = SessionId::new(req.project_id.clone());
    let tasklock = state.tasklocks.get_or_create(project_id.clone());

    let (bus, reader) = EventBus::new(state.config.event_queue_capacity);
    let stop = Arc::new(Notify::new());
    state.register_session(
        project_id.clone(),
        Arc::new(ProjectSession {
            tasklock: tasklock.clone(),
            bus: bus.clone(),
            stop: stop.clone(),
        }),
    );

    let hooks = Arc::new(HookPipeline::new());
    let model_hook = Arc::new(EventPublishingModelHook::new(bus.clone(), system_now_ms));
    hooks.register_before_model(model_hook.clone());
    hooks.register_after_model(model_hook);
    let tool_hook = Arc::new(EventPublishingToolHook::new(bus.clone(), system_now_ms));
    hooks.register_before_tool(tool_hook.clone());
    hooks.register_after_tool(tool_hook);

    let workers = build_workers(&req.new_agents);
    let provider = (state.provider_factory)(&req.question);
    let scheduler = Scheduler::new(
        state.config.scheduler_config(),
        bus.clone(),
        state.clock.clone(),
        state.recovery.clone(),
        hooks,
    );
    let workforce = workforce_engine::Workforce::new(
        state.planner.clone(),
        state.coordinator.clone(),
        scheduler,
        bus.clone(),
        state.clock.clone(),
        workers.clone(),
        std::collections::HashMap::new(),
        provider,
        stop,
    );

    let task_id = req.task_id.clone().unwrap_or_else(|| req.project_id.clone());
    let task = Task::new(task_id, req.question.clone());

    let run_tasklock = tasklock.clone();
    let run_bus = bus;
    let run_clock = state.clock.clone();
    tokio::spawn(async move {
        let (mut graph, mut assignment) = match workforce.plan(&task).await {
            ExecutionPlan::Simple(result) => {
                let _ = run_tasklock.set_status(TaskLockStatus::Confirmed);
                let _ = run_tasklock.set_status(TaskLockStatus::Processing);
                run_tasklock.update_last_task_result(result.output.clone(), result.error.clone());
                let next = if result.success { TaskLockStatus::Done } else { TaskLockStatus::Failed };
                let _ = run_tasklock.set_status(next);
                return;
            }
            ExecutionPlan::Decomposed { graph, assignment } => (graph, assignment),
        };

        run_tasklock.wait_for_status(|s| s == TaskLockStatus::Confirmed).await;
        for update in run_tasklock.take_pending_task_updates() {
            apply_task_update(&mut graph, &mut assignment, &workers, &run_bus, run_clock.now_ms(), &update);
        }

        let _ = run_tasklock.set_status(TaskLockStatus::Processing);
        let result = workforce.run_graph(&task, graph, assignment).await;
        run_tasklock.update_last_task_result(result.output.clone(), result.error.clone());
        let next = if result.success { TaskLockStatus::Done } else { TaskLockStatus::Failed };
        let _ = run_tasklock.set_status(next);
    });

    let adapter = SseAdapter::new(state.config.sse_heartbeat);
    let frames = adapter.stream(reader, tasklock);
    let body_stream = frames.map(|text| Ok::<_, Infallible>(Bytes::from(text)));

    // `Body::from_stream` only errors on a malformed `http::response::Parts`;
    // every part here is a literal, so building it cannot fail.
    #[allow(clippy::expect_used)]
    let response = Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "text/event-stream")
        .header("cache-control", "no-cache")
        .body(Body::from_stream(body_stream))
        .expect("static response parts are always valid");
    Ok(response)
}

fn lookup(state: &AppState, project_id: &str) -> Result<Arc<workforce_tasklock::TaskLock>, ApiError> {
    state
        .tasklocks
        .get(&SessionId::new(project_id))
        .ok_or_else(|| ApiError::ProjectNotFound(project_id.to_string()))
}

/// `POST /chat/{project_id}`: a follow-up message on a running or finished
/// project. Appended to conversation history and enqueued as a `supplement`
/// control action for the scheduler to pick up between subtask dispatches.
async fn supplement_chat(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(req): Json<FollowUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tasklock = lookup(&state, &project_id)?;
    let now = state.clock.now_ms();
    tasklock.add_conversation(workforce_tasklock::ConversationRole::User, req.question.clone(), now);
    tasklock
        .put_action(ActionRecord::new(Action::Supplement, json!({ "question": req.question }), now))
        .await
        .map_err(|_| ApiError::QueueFull)?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "accepted", "project_id": project_id }))))
}

/// `DELETE /chat/{project_id}/skip-task`: requests a soft stop. Notifies the
/// session's stop signal — the same `Notify` the running `Workforce` was
/// built with — and records a `skip_task` action for audit.
async fn skip_task(State(state): State<Arc<AppState>>, Path(project_id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let session = state
        .session(&SessionId::new(project_id.clone()))
        .ok_or_else(|| ApiError::ProjectNotFound(project_id.clone()))?;

    session.stop.notify_waiters();
    let now = state.clock.now_ms();
    session
        .tasklock
        .put_action(ActionRecord::new(Action::SkipTask, json!({}), now))
        .await
        .map_err(|_| ApiError::QueueFull)?;

    Ok((StatusCode::CREATED, Json(json!({ "status": "stopped", "project_id": project_id }))))
}

/// `PUT /task/{project_id}`: submits an edit (`{"add": [...], "remove":
/// [...]}`) to the not-yet-started subtask graph. Recorded as an
/// `update_task` control action for the SSE echo, and separately queued on
/// the `TaskLock` so the execution task picks it up once it wakes for
/// `POST /task/{project_id}/start`.
async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(req): Json<TaskUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let tasklock = lookup(&state, &project_id)?;
    let now = state.clock.now_ms();
    tasklock
        .put_action(ActionRecord::new(Action::UpdateTask, json!({ "task": req.task }), now))
        .await
        .map_err(|_| ApiError::QueueFull)?;
    tasklock.queue_task_update(req.task.clone());

    Ok(Json(json!({ "status": "updated", "project_id": project_id })))
}

/// `POST /task/{project_id}/start`: confirms the plan. Transitions CONFIRMING
/// to CONFIRMED and enqueues a `start` control action.
async fn start_task(State(state): State<Arc<AppState>>, Path(project_id): Path<String>) -> Result<impl IntoResponse, ApiError> {
    let tasklock = lookup(&state, &project_id)?;
    tasklock.set_status(TaskLockStatus::Confirmed)?;
    let now = state.clock.now_ms();
    tasklock
        .put_action(ActionRecord::new(Action::Start, json!({}), now))
        .await
        .map_err(|_| ApiError::QueueFull)?;

    Ok(Json(json!({ "status": "started", "project_id": project_id })))
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
