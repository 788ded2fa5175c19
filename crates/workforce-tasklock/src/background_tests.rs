use std::time::Duration;

use super::*;

#[tokio::test]
async fn cleanup_aborts_tracked_tasks() {
    let registry = BackgroundTasks::new();
    let handle = tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(60)).await;
    });
    registry.track(handle);
    assert_eq!(registry.count(), 1);

    registry.cleanup();

    // Give the runtime a tick to deliver the abort.
    tokio::task::yield_now().await;
    assert_eq!(registry.count(), 0);
}

#[tokio::test]
async fn cleanup_called_twice_is_equivalent_to_once() {
    let registry = BackgroundTasks::new();
    registry.track(tokio::spawn(async {}));

    registry.cleanup();
    assert!(registry.is_cleaned_up());
    // Second call must not panic and must leave state unchanged.
    registry.cleanup();
    assert_eq!(registry.count(), 0);
}
