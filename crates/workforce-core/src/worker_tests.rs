use super::*;

fn entry(n: i64) -> WorkflowMemoryEntry {
    WorkflowMemoryEntry {
        task_id: TaskId::new(format!("t{n}")),
        task_description: "desc".to_string(),
        result: serde_json::json!("ok"),
        worker_id: WorkerId::new("w1"),
        timestamp_ms: n,
    }
}

#[test]
fn workflow_memory_disabled_by_default_is_a_noop() {
    let mut worker = Worker::new("w1", "researcher");
    worker.push_workflow_memory(entry(1));
    assert!(worker.workflow_memory_snapshot().is_empty());
}

#[test]
fn workflow_memory_evicts_oldest_past_capacity() {
    let mut worker = Worker::new("w1", "researcher").with_workflow_memory(2);
    worker.push_workflow_memory(entry(1));
    worker.push_workflow_memory(entry(2));
    worker.push_workflow_memory(entry(3));

    let snapshot = worker.workflow_memory_snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].timestamp_ms, 2);
    assert_eq!(snapshot[1].timestamp_ms, 3);
}

#[test]
fn has_capability_checks_set_membership() {
    let worker = Worker::new("w1", "researcher").with_capabilities(["search".to_string()]);
    assert!(worker.has_capability("search"));
    assert!(!worker.has_capability("code"));
}
