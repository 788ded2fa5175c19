use super::*;

fn task(id: &str, deps: &[&str]) -> Task {
    Task::new(id, format!("do {id}")).with_dependencies(deps.iter().map(|d| TaskId::new(*d)).collect())
}

#[test]
fn insert_rejects_duplicate_ids() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    let err = graph.insert(task("a", &[])).unwrap_err();
    assert_eq!(err, GraphError::DuplicateId("a".to_string()));
}

#[test]
fn insert_rejects_dangling_dependency() {
    let mut graph = SubtaskGraph::new();
    let err = graph.insert(task("a", &["missing"])).unwrap_err();
    assert_eq!(
        err,
        GraphError::UnknownDependency("a".to_string(), "missing".to_string())
    );
}

#[test]
fn insert_rejects_cycle() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    graph.insert(task("b", &["a"])).unwrap();
    // manually splice a cycle back onto "a" to exercise has_cycle via set then reinsert path
    graph.get_mut(&TaskId::new("a")).unwrap().dependencies.push(TaskId::new("b"));
    assert!(graph.has_cycle());
}

#[test]
fn ready_ids_only_includes_tasks_whose_deps_are_done() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    graph.insert(task("b", &["a"])).unwrap();

    assert_eq!(graph.ready_ids(), vec![TaskId::new("a")]);

    graph.set_state(&TaskId::new("a"), SubtaskState::Done).unwrap();
    assert_eq!(graph.ready_ids(), vec![TaskId::new("b")]);
}

#[test]
fn rewire_dependents_replaces_old_id_with_new_ids() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    graph.insert(task("b", &["a"])).unwrap();
    graph.insert(task("a_replanned", &[])).unwrap();

    graph.rewire_dependents(&TaskId::new("a"), &[TaskId::new("a_replanned")]);

    let b = graph.get(&TaskId::new("b")).unwrap();
    assert_eq!(b.dependencies, vec![TaskId::new("a_replanned")]);
}

#[test]
fn all_terminal_is_false_until_every_state_is_terminal() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    assert!(!graph.all_terminal());
    graph.set_state(&TaskId::new("a"), SubtaskState::Done).unwrap();
    assert!(graph.all_terminal());
}

#[test]
fn remove_pending_drops_a_leaf_task() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    graph.remove_pending(&TaskId::new("a")).unwrap();
    assert!(graph.get(&TaskId::new("a")).is_none());
    assert_eq!(graph.len(), 0);
}

#[test]
fn remove_pending_rejects_a_task_with_dependents() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    graph.insert(task("b", &["a"])).unwrap();
    let err = graph.remove_pending(&TaskId::new("a")).unwrap_err();
    assert_eq!(err, GraphError::NotRemovable("a".to_string()));
}

#[test]
fn remove_pending_rejects_a_task_already_in_flight() {
    let mut graph = SubtaskGraph::new();
    graph.insert(task("a", &[])).unwrap();
    graph.set_state(&TaskId::new("a"), SubtaskState::InFlight).unwrap();
    let err = graph.remove_pending(&TaskId::new("a")).unwrap_err();
    assert_eq!(err, GraphError::NotRemovable("a".to_string()));
}
