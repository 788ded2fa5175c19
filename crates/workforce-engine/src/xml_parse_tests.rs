use super::*;

#[test]
fn parses_well_formed_tasks_root() {
    let xml = "<tasks><task><description>search</description><dependencies></dependencies></task>\
               <task><description>summarize</description><dependencies>1</dependencies></task></tasks>";
    let parsed = parse_subtasks_xml(xml);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].description, "search");
    assert_eq!(parsed[1].description, "summarize");
}

#[test]
fn parses_bare_task_siblings_without_tasks_root() {
    let xml = "<task><description>one</description></task><task><description>two</description></task>";
    let parsed = parse_subtasks_xml(xml);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].description, "one");
    assert_eq!(parsed[1].description, "two");
}

#[test]
fn regex_scrapes_task_tags_from_malformed_xml() {
    let xml = "some preamble <task>do the thing</task> trailing garbage < not closed";
    let parsed = parse_subtasks_xml(xml);
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].description, "do the thing");
}

#[test]
fn returns_empty_when_nothing_matches_any_tier() {
    let parsed = parse_subtasks_xml("no tasks here at all");
    assert!(parsed.is_empty());
}

#[test]
fn extracts_dependencies_and_priority_fields() {
    let xml = "<tasks><task><description>d</description><dependencies>a, b</dependencies><priority>2</priority></task></tasks>";
    let parsed = parse_subtasks_xml(xml);
    assert_eq!(parsed[0].dependencies, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(parsed[0].priority, 2);
}
