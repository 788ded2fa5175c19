use super::*;

#[test]
fn get_or_create_returns_the_same_lock_for_the_same_project() {
    let registry = TaskLockRegistry::new();
    let first = registry.get_or_create("p1");
    let second = registry.get_or_create("p1");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn remove_drops_the_lock_from_the_registry() {
    let registry = TaskLockRegistry::new();
    registry.get_or_create("p1");
    let removed = registry.remove(&SessionId::new("p1"));
    assert!(removed.is_some());
    assert_eq!(registry.len(), 0);
}
