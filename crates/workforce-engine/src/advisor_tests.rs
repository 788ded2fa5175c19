use super::*;
use workforce_core::{Task, TaskId, Worker, WorkerId};

fn task_with_requirements(id: &str, caps: &[&str]) -> Task {
    let mut task = Task::new(TaskId::new(id), "do something");
    task.set_context(
        "required_capabilities",
        serde_json::json!(caps.iter().map(|c| c.to_string()).collect::<Vec<_>>()),
    );
    task
}

#[test]
fn null_advisor_proposes_nothing() {
    let advisor = NullAdvisor;
    let tasks = vec![task_with_requirements("t1", &["rust"])];
    let workers = vec![Worker::new(WorkerId::new("w1"), "coder")];
    assert!(advisor.propose_assignment(&tasks, &workers).is_empty());
}

#[test]
fn capability_match_advisor_picks_best_overlap() {
    let advisor = CapabilityMatchAdvisor;
    let tasks = vec![task_with_requirements("t1", &["rust", "web"])];
    let workers = vec![
        Worker::new(WorkerId::new("w1"), "writer").with_capabilities(["writing".to_string()]),
        Worker::new(WorkerId::new("w2"), "coder")
            .with_capabilities(["rust".to_string(), "web".to_string()]),
    ];
    let assignment = advisor.propose_assignment(&tasks, &workers);
    assert_eq!(assignment.get("t1"), Some(&WorkerId::new("w2")));
}

#[test]
fn capability_match_advisor_leaves_task_unassigned_without_declared_requirements() {
    let advisor = CapabilityMatchAdvisor;
    let tasks = vec![Task::new(TaskId::new("t1"), "no requirements declared")];
    let workers = vec![Worker::new(WorkerId::new("w1"), "coder")];
    assert!(advisor.propose_assignment(&tasks, &workers).is_empty());
}

#[test]
fn capability_match_advisor_leaves_task_unassigned_when_no_worker_overlaps() {
    let advisor = CapabilityMatchAdvisor;
    let tasks = vec![task_with_requirements("t1", &["rust"])];
    let workers = vec![Worker::new(WorkerId::new("w1"), "writer").with_capabilities(["writing".to_string()])];
    assert!(advisor.propose_assignment(&tasks, &workers).is_empty());
}
