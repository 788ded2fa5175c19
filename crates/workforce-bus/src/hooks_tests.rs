use super::*;
use crate::bus::DEFAULT_QUEUE_CAPACITY;

struct VetoingHook;

impl BeforeModelHook for VetoingHook {
    fn name(&self) -> &str {
        "vetoing-hook"
    }

    fn before_model_call(&self, _ctx: &ModelCallContext) -> bool {
        false
    }
}

struct AllowingHook;

impl BeforeModelHook for AllowingHook {
    fn name(&self) -> &str {
        "allowing-hook"
    }

    fn before_model_call(&self, _ctx: &ModelCallContext) -> bool {
        true
    }
}

fn ctx() -> ModelCallContext {
    ModelCallContext {
        agent_id: WorkerId::new("w1"),
        task_id: TaskId::new("t1"),
        messages: vec![],
        model: "test-model".to_string(),
        iteration: 0,
    }
}

#[test]
fn veto_short_circuits_and_names_the_vetoing_hook() {
    let pipeline = HookPipeline::new();
    pipeline.register_before_model(Arc::new(AllowingHook));
    pipeline.register_before_model(Arc::new(VetoingHook));

    let result = pipeline.check_before_model(&ctx());
    assert_eq!(result, Err("vetoing-hook".to_string()));
}

#[test]
fn all_allowing_hooks_pass() {
    let pipeline = HookPipeline::new();
    pipeline.register_before_model(Arc::new(AllowingHook));
    assert!(pipeline.check_before_model(&ctx()).is_ok());
}

#[test]
fn event_publishing_model_hook_emits_activate_then_deactivate() {
    let (bus, _reader) = EventBus::new(DEFAULT_QUEUE_CAPACITY);
    let hook = EventPublishingModelHook::new(bus.clone(), || 0);
    assert!(hook.before_model_call(&ctx()));
    hook.after_model_call(&ctx(), &ModelCallOutcome::default());

    let history = bus.log().history(None, None, None, None);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].action, WorkforceAction::AgentActivated);
    assert_eq!(history[1].action, WorkforceAction::AgentDeactivated);
}
