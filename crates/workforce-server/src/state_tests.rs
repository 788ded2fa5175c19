use std::sync::Arc;

use workforce_core::id::SessionId;
use workforce_core::SystemClock;
use workforce_tasklock::TaskLock;

use super::*;

fn test_state() -> Arc<AppState> {
    AppState::new(RuntimeConfig::default(), Arc::new(SystemClock), default_provider_factory())
}

#[test]
fn new_app_state_starts_with_no_sessions() {
    let state = test_state();
    assert_eq!(state.tasklocks.len(), 0);
    assert!(state.session(&SessionId::new("missing")).is_none());
}

#[test]
fn registered_sessions_can_be_looked_up() {
    let state = test_state();
    let project_id = SessionId::new("p1");
    let (bus, _reader) = EventBus::new(8);
    let session = Arc::new(ProjectSession {
        tasklock: Arc::new(TaskLock::new(project_id.clone())),
        bus,
        stop: Arc::new(Notify::new()),
    });

    state.register_session(project_id.clone(), session);
    assert!(state.session(&project_id).is_some());
    assert!(state.session(&SessionId::new("other")).is_none());
}

#[tokio::test]
async fn default_provider_factory_echoes_the_question() {
    let factory = default_provider_factory();
    let provider = factory("what is 2+2?");
    let messages = [workforce_providers::ChatMessage::user("what is 2+2?")];
    let completion = provider.complete(&messages).await.unwrap();
    assert!(completion.content.contains("what is 2+2?"));
}
