use regex::Regex;

use super::*;

#[test]
fn frame_matches_the_required_regex_and_parses_back() {
    let frame = WireFrame::new(WireEvent::WaitConfirm, serde_json::json!({"content": "hi"}));
    let text = frame.to_sse_text();

    let re = Regex::new(r"^data: \{.*\}\n\n$").unwrap();
    assert!(re.is_match(&text), "frame did not match required shape: {text:?}");

    let body = text.trim_start_matches("data: ").trim_end();
    let parsed: serde_json::Value = serde_json::from_str(body).unwrap();
    assert_eq!(parsed["step"], "wait_confirm");
    assert!(parsed.get("data").is_some());
}

#[test]
fn heartbeat_has_empty_data() {
    let frame = WireFrame::heartbeat();
    assert_eq!(frame.step, WireEvent::Sync);
    assert_eq!(frame.data, serde_json::json!({}));
}

#[test]
fn every_workforce_action_projects_to_exactly_one_frame() {
    let actions = [
        WorkforceAction::Confirmed,
        WorkforceAction::TaskDecomposed,
        WorkforceAction::SubtasksReady,
        WorkforceAction::TaskAssigned,
        WorkforceAction::AgentActivated,
        WorkforceAction::AgentDeactivated,
        WorkforceAction::TaskStateChanged,
        WorkforceAction::NewTaskState,
        WorkforceAction::ToolkitActivated,
        WorkforceAction::ToolkitDeactivated,
        WorkforceAction::WaitConfirm,
        WorkforceAction::Ask,
        WorkforceAction::Notice,
        WorkforceAction::WriteFile,
        WorkforceAction::Terminal,
        WorkforceAction::BudgetNotEnough,
        WorkforceAction::ContextTooLong,
        WorkforceAction::TaskAdded,
        WorkforceAction::TaskRemoved,
        WorkforceAction::SessionEnded,
        WorkforceAction::SessionError,
    ];
    for action in actions {
        let event = Event::new(action, serde_json::json!({}), 0);
        assert!(project_event(&event).is_some(), "{action:?} produced no frame");
    }
}

#[test]
fn unmapped_control_actions_produce_no_frame() {
    for action in [
        Action::Improve,
        Action::Start,
        Action::Stop,
        Action::Supplement,
        Action::Pause,
        Action::Resume,
        Action::SkipTask,
    ] {
        let record = ActionRecord::new(action, serde_json::json!({}), 0);
        assert!(project_action(&record).is_none(), "{action:?} unexpectedly produced a frame");
    }
}

#[test]
fn mapped_control_actions_produce_exactly_one_frame() {
    let record = ActionRecord::new(Action::AddTask, serde_json::json!({"task_id": "t1"}), 0);
    let frame = project_action(&record).expect("add_task should project");
    assert_eq!(frame.step, WireEvent::AddTask);
}
