use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;

use workforce_bus::event::{Event, WorkforceAction};
use workforce_bus::EventBus;
use workforce_core::id::SessionId;
use workforce_tasklock::{Action, ActionRecord, TaskLock};

use super::*;

#[tokio::test]
async fn bus_events_are_projected_and_streamed() {
    let (bus, reader) = EventBus::new(16);
    let tasklock = Arc::new(TaskLock::new(SessionId::new("p1")));
    let adapter = SseAdapter::new(Duration::from_secs(30));
    let mut stream = adapter.stream(reader, tasklock);

    bus.publish(Event::new(WorkforceAction::Confirmed, serde_json::json!({"question": "hi"}), 0));

    let frame = stream.next().await.expect("expected a frame");
    assert!(frame.starts_with("data: "));
    assert!(frame.ends_with("\n\n"));
    assert!(frame.contains("\"confirmed\""));
}

#[tokio::test]
async fn end_frame_terminates_the_stream() {
    let (bus, reader) = EventBus::new(16);
    let tasklock = Arc::new(TaskLock::new(SessionId::new("p2")));
    let adapter = SseAdapter::new(Duration::from_secs(30));
    let mut stream = adapter.stream(reader, tasklock);

    bus.publish(Event::new(WorkforceAction::SessionEnded, serde_json::json!({"summary": "done"}), 0));

    let frame = stream.next().await.expect("expected the end frame");
    assert!(frame.contains("\"end\""));
    assert!(stream.next().await.is_none(), "stream should close after end");
}

#[tokio::test]
async fn queued_actions_are_drained_and_projected() {
    let (_bus, reader) = EventBus::new(16);
    let tasklock = Arc::new(TaskLock::new(SessionId::new("p3")));
    let adapter = SseAdapter::new(Duration::from_secs(30));
    let mut stream = adapter.stream(reader, tasklock.clone());

    tasklock
        .put_action(ActionRecord::new(Action::AddTask, serde_json::json!({"task_id": "t1"}), 0))
        .await
        .unwrap();

    let frame = stream.next().await.expect("expected an add_task frame");
    assert!(frame.contains("\"add_task\""));
}

#[tokio::test(start_paused = true)]
async fn heartbeat_fires_when_nothing_else_does() {
    let (_bus, reader) = EventBus::new(16);
    let tasklock = Arc::new(TaskLock::new(SessionId::new("p4")));
    let adapter = SseAdapter::new(Duration::from_millis(50));
    let mut stream = adapter.stream(reader, tasklock);

    tokio::time::advance(Duration::from_millis(60)).await;
    let frame = stream.next().await.expect("expected a heartbeat frame");
    assert!(frame.contains("\"sync\""));
}
