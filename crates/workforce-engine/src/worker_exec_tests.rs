use super::*;
use workforce_bus::{AfterModelHook, BeforeModelHook};
use workforce_core::{FakeClock, TaskId, Worker, WorkerId};
use workforce_providers::{FakeProvider, ProviderError, ScriptedResponse};

fn task() -> Task {
    Task::new(TaskId::new("t1"), "say hi").with_expected_output("a greeting")
}

#[tokio::test]
async fn success_records_attempt_and_pushes_workflow_memory() {
    let provider = FakeProvider::echo("p", "hello there");
    let executor = WorkerExecutor::new(Arc::new(HookPipeline::new()), Arc::new(FakeClock::new(1_000)));
    let mut worker = Worker::new(WorkerId::new("w1"), "greeter").with_workflow_memory(10);

    let result = executor.process(&provider, &mut worker, &task(), None, None, 1).await;

    assert!(result.success);
    assert_eq!(worker.attempt_history.len(), 1);
    assert!(worker.attempt_history[0].success);
    assert_eq!(worker.workflow_memory_snapshot().len(), 1);
}

#[tokio::test]
async fn provider_error_never_propagates_and_is_recorded_as_failure() {
    let provider = FakeProvider::new("p", vec![ScriptedResponse::Err(ProviderError::Network("down".into()))]);
    let executor = WorkerExecutor::new(Arc::new(HookPipeline::new()), Arc::new(FakeClock::new(0)));
    let mut worker = Worker::new(WorkerId::new("w1"), "greeter");

    let result = executor.process(&provider, &mut worker, &task(), None, None, 1).await;

    assert!(!result.success);
    assert!(result.error.is_some());
    assert_eq!(worker.attempt_history.len(), 1);
    assert!(!worker.attempt_history[0].success);
}

struct VetoHook;
impl BeforeModelHook for VetoHook {
    fn name(&self) -> &str {
        "veto-hook"
    }
    fn before_model_call(&self, _ctx: &ModelCallContext) -> bool {
        false
    }
}

struct RecordingAfterHook {
    seen_error: std::sync::Mutex<Option<String>>,
}

impl AfterModelHook for RecordingAfterHook {
    fn after_model_call(&self, _ctx: &ModelCallContext, outcome: &ModelCallOutcome) {
        *self.seen_error.lock().unwrap() = outcome.error.clone();
    }
}

#[tokio::test]
async fn before_model_veto_skips_the_call_and_records_failure() {
    let provider = FakeProvider::echo("p", "should never be seen");
    let hooks = Arc::new(HookPipeline::new());
    hooks.register_before_model(Arc::new(VetoHook));
    let after = Arc::new(RecordingAfterHook { seen_error: std::sync::Mutex::new(None) });
    hooks.register_after_model(after.clone());

    let executor = WorkerExecutor::new(hooks, Arc::new(FakeClock::new(0)));
    let mut worker = Worker::new(WorkerId::new("w1"), "greeter");

    let result = executor.process(&provider, &mut worker, &task(), None, None, 1).await;

    assert!(!result.success);
    assert_eq!(provider.call_count(), 0);
    assert!(after.seen_error.lock().unwrap().as_ref().unwrap().contains("veto-hook"));
}

#[tokio::test]
async fn dependency_results_and_parent_content_are_injected_without_mutating_the_stored_task() {
    let provider = FakeProvider::echo("p", "done");
    let executor = WorkerExecutor::new(Arc::new(HookPipeline::new()), Arc::new(FakeClock::new(0)));
    let mut worker = Worker::new(WorkerId::new("w1"), "greeter");
    let original = task();

    let mut deps = std::collections::HashMap::new();
    deps.insert(
        TaskId::new("dep1"),
        TaskResult::success(TaskId::new("dep1"), WorkerId::new("w0"), serde_json::json!("ok"), 5, 1),
    );

    let result = executor
        .process(&provider, &mut worker, &original, Some("parent output"), Some(&deps), 1)
        .await;

    assert!(result.success);
    assert!(original.context.is_empty());
}
