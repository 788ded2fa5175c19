use super::*;

#[tokio::test]
async fn submit_then_next_answer_delivers_in_fifo_order() {
    let registry = HumanInputRegistry::new();
    registry.submit_answer("agent-a", "first".to_string());
    registry.submit_answer("agent-a", "second".to_string());

    assert_eq!(registry.next_answer("agent-a").await, "first");
    assert_eq!(registry.next_answer("agent-a").await, "second");
}

#[tokio::test]
async fn queues_are_isolated_per_agent_name() {
    let registry = HumanInputRegistry::new();
    registry.submit_answer("agent-a", "for-a".to_string());
    registry.submit_answer("agent-b", "for-b".to_string());

    assert_eq!(registry.next_answer("agent-b").await, "for-b");
    assert_eq!(registry.next_answer("agent-a").await, "for-a");
}

#[tokio::test]
async fn next_answer_waits_until_an_answer_is_submitted() {
    let registry = Arc::new(HumanInputRegistry::new());
    let reader = {
        let registry = registry.clone();
        tokio::spawn(async move { registry.next_answer("agent-a").await })
    };
    tokio::task::yield_now().await;
    registry.submit_answer("agent-a", "late".to_string());

    assert_eq!(reader.await.unwrap(), "late");
}
