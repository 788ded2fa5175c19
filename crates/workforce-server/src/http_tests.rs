use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use workforce_core::id::SessionId;
use workforce_core::SystemClock;
use workforce_tasklock::TaskLockStatus;

use super::*;
use crate::state::{default_provider_factory, AppState};

fn test_app() -> Router {
    let state = AppState::new(RuntimeConfig::default(), Arc::new(SystemClock), default_provider_factory());
    router(state)
}

fn test_app_with_state() -> (Router, Arc<AppState>) {
    let state = AppState::new(RuntimeConfig::default(), Arc::new(SystemClock), default_provider_factory());
    (router(state.clone()), state)
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn chat_with_empty_question_is_rejected() {
    let app = test_app();
    let body = serde_json::json!({ "project_id": "p1", "question": "" }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_starts_a_project_and_streams_sse() {
    let app = test_app();
    let body = serde_json::json!({ "project_id": "p2", "question": "hello there" }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
}

#[tokio::test]
async fn supplement_on_unknown_project_is_not_found() {
    let app = test_app();
    let body = serde_json::json!({ "question": "anything" }).to_string();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat/does-not-exist")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A decomposed plan waits on CONFIRMED before any subtask runs, and only
/// reaches it once the client hits `/task/{id}/start` — the two-phase flow
/// the routes advertise.
#[tokio::test]
async fn decomposed_task_waits_for_start_before_executing() {
    let (app, state) = test_app_with_state();
    let body = serde_json::json!({
        "project_id": "p3",
        "question": "Write a detailed, multi-section report covering history, current state, and future outlook"
    })
    .to_string();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/chat")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let tasklock = state.tasklocks.get(&SessionId::new("p3")).unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(tasklock.status(), TaskLockStatus::Confirming, "must not start before /start is called");

    let start_response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/task/p3/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(start_response.status(), StatusCode::OK);

    for _ in 0..100 {
        if tasklock.status().is_terminal() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(tasklock.status(), TaskLockStatus::Done);
    assert!(tasklock.last_task_result().is_some());
}

#[tokio::test]
async fn start_task_on_unknown_project_is_not_found() {
    let app = test_app();
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/task/does-not-exist/start")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
