use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::advisor::NullAdvisor;
use crate::coordinator::LlmCoordinator;
use crate::planner::LlmPlanner;
use crate::recovery::{LlmFailureAnalyzer, RecoveryEngine};
use crate::scheduler::SchedulerConfig;
use crate::worker_factory::TemplateWorkerFactory;
use tokio::sync::Notify;
use workforce_bus::hooks::HookPipeline;
use workforce_core::id::SequentialIdGen;
use workforce_core::FakeClock;
use workforce_providers::FakeProvider;

fn workforce_with(
    classifier_and_answer_provider: Arc<FakeProvider>,
    planner_provider: Arc<FakeProvider>,
    workers: Vec<Worker>,
) -> Workforce {
    let (bus, _reader) = EventBus::new(64);
    let planner = Arc::new(LlmPlanner::new(planner_provider));
    let coordinator = Arc::new(LlmCoordinator::new(classifier_and_answer_provider.clone()).with_advisor(Arc::new(NullAdvisor)));
    let analyzer = Arc::new(LlmFailureAnalyzer::new(Arc::new(FakeProvider::echo("analyzer", "not json"))));
    let factory = Arc::new(TemplateWorkerFactory::new(Arc::new(SequentialIdGen::new("w"))));
    let recovery = Arc::new(RecoveryEngine::new(analyzer, planner.clone(), factory));
    let clock = Arc::new(FakeClock::new(0));
    let scheduler = Scheduler::new(
        SchedulerConfig::default(),
        bus.clone(),
        clock.clone(),
        recovery,
        Arc::new(HookPipeline::new()),
    );
    Workforce::new(
        planner,
        coordinator,
        scheduler,
        bus,
        clock,
        workers,
        HashMap::new(),
        classifier_and_answer_provider,
        Arc::new(Notify::new()),
    )
}

#[tokio::test]
async fn simple_question_takes_the_fast_path_and_skips_decomposition() {
    let provider = Arc::new(FakeProvider::echo("direct", "Hello there!"));
    let workforce = workforce_with(provider, Arc::new(FakeProvider::echo("planner", "")), vec![]);

    let task = Task::new(TaskId::new("t1"), "hi");
    let result = workforce.execute(&task).await;

    assert!(result.success);
    assert_eq!(result.output, serde_json::json!("Hello there!"));

    let log = workforce.bus.log();
    assert_eq!(log.history(None, None, Some(WorkforceAction::WaitConfirm), None).len(), 1);
    assert_eq!(log.history(None, None, Some(WorkforceAction::TaskDecomposed), None).len(), 0);
}

#[tokio::test]
async fn complex_task_decomposes_and_composes_from_subtask_results() {
    let answer_provider = Arc::new(FakeProvider::echo("worker", "subtask output"));
    let planner_provider = Arc::new(FakeProvider::echo(
        "planner",
        "<tasks><task><description>research the topic in depth</description></task></tasks>",
    ));
    let workers = vec![Worker::new(WorkerId::new("w1"), "generalist")];
    let workforce = workforce_with(answer_provider, planner_provider, workers);

    let task = Task::new(
        TaskId::new("root"),
        "Write a detailed, multi-section report covering history, current state, and future outlook",
    );
    let result = workforce.execute(&task).await;

    assert!(result.success);
    let log = workforce.bus.log();
    assert_eq!(log.history(None, None, Some(WorkforceAction::TaskDecomposed), None).len(), 1);
    assert_eq!(log.history(None, None, Some(WorkforceAction::WaitConfirm), None).len(), 0);
}

#[tokio::test]
async fn decomposition_with_no_assignable_worker_fails_without_invoking_one() {
    let answer_provider = Arc::new(FakeProvider::new("worker", vec![]));
    let planner_provider = Arc::new(FakeProvider::echo("planner", "no usable tasks here"));
    let workforce = workforce_with(answer_provider.clone(), planner_provider, vec![]);

    let task = Task::new(
        TaskId::new("root"),
        "Write a detailed, multi-section report covering history, current state, and future outlook",
    );
    let result = workforce.execute(&task).await;
    assert!(!result.success);
    // Exactly one call: the ambiguous-question classifier. No worker is ever
    // assigned, so no subtask execution call follows it.
    assert_eq!(answer_provider.call_count(), 1);
}
