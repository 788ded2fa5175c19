use std::time::Duration;

use super::*;
use crate::action::Action;

fn record() -> ActionRecord {
    ActionRecord::new(Action::Supplement, serde_json::json!({"text": "hi"}), 0)
}

#[tokio::test]
async fn put_then_get_returns_fifo_order() {
    let queue = ActionQueue::new(DEFAULT_CAPACITY);
    queue.put(record()).await.unwrap();
    queue
        .put(ActionRecord::new(Action::Stop, serde_json::json!({}), 1))
        .await
        .unwrap();

    let first = queue.get(None).await.unwrap();
    let second = queue.get(None).await.unwrap();
    assert_eq!(first.action, Action::Supplement);
    assert_eq!(second.action, Action::Stop);
}

#[tokio::test]
async fn put_rejects_once_at_capacity() {
    let queue = ActionQueue::new(1);
    queue.put(record()).await.unwrap();
    let err = queue.put(record()).await.unwrap_err();
    assert_eq!(err, QueueFullError { capacity: 1 });
}

#[tokio::test]
async fn get_times_out_when_empty() {
    let queue = ActionQueue::new(DEFAULT_CAPACITY);
    let result = queue.get(Some(Duration::from_millis(20))).await;
    assert!(result.is_none());
}

#[tokio::test]
async fn drain_empties_the_queue() {
    let queue = ActionQueue::new(DEFAULT_CAPACITY);
    queue.put(record()).await.unwrap();
    queue.drain().await;
    assert!(queue.is_empty().await);
}
