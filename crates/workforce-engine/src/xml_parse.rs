// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Defensive parsing of the planner's XML-like decomposition output.
//!
//! Three-tier fallback, in preference order: well-formed `<tasks><task>`,
//! bare `<task>` siblings, regex-scraped `<task>...</task>` substrings. If all
//! three fail, the caller falls back to a single subtask.

use regex::Regex;

/// One parsed `<task>` element's raw fields before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSubtask {
    pub description: String,
    pub expected_output: String,
    pub dependencies: Vec<String>,
    pub priority: u8,
}

fn extract_fields(inner_xml: &str) -> ParsedSubtask {
    let wrapped = format!("<task>{inner_xml}</task>");
    if let Ok(doc) = roxmltree::Document::parse(&wrapped) {
        let root = doc.root_element();
        let text_of = |tag: &str| -> Option<String> {
            root.descendants()
                .find(|n| n.has_tag_name(tag))
                .and_then(|n| n.text())
                .map(|t| t.trim().to_string())
        };
        let has_structured_children = root.children().any(|c| c.is_element());
        if has_structured_children {
            let description = text_of("description").unwrap_or_default();
            let expected_output = text_of("expected_output").unwrap_or_default();
            let dependencies = text_of("dependencies")
                .map(|d| {
                    d.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default();
            let priority = text_of("priority")
                .and_then(|p| p.parse::<u8>().ok())
                .unwrap_or(0);
            return ParsedSubtask {
                description,
                expected_output,
                dependencies,
                priority,
            };
        }
    }
    ParsedSubtask {
        description: inner_xml.trim().to_string(),
        expected_output: String::new(),
        dependencies: Vec::new(),
        priority: 0,
    }
}

fn regex_scrape(xml: &str) -> Vec<ParsedSubtask> {
    // `(?s)` makes `.` match newlines, since model output often wraps lines.
    let re = match Regex::new(r"(?s)<task>(.*?)</task>") {
        Ok(re) => re,
        Err(_) => return Vec::new(),
    };
    re.captures_iter(xml)
        .map(|cap| extract_fields(&cap[1]))
        .collect()
}

/// Parses the model's decomposition output into subtask definitions. Never
/// fails: returns an empty vec if nothing matches any tier (the caller then
/// applies the single-subtask fallback).
pub fn parse_subtasks_xml(xml: &str) -> Vec<ParsedSubtask> {
    let wrapped = format!("<root>{xml}</root>");
    match roxmltree::Document::parse(&wrapped) {
        Ok(doc) => {
            let root = doc.root_element();
            if let Some(tasks_elem) = root.descendants().find(|n| n.has_tag_name("tasks")) {
                let found: Vec<ParsedSubtask> = tasks_elem
                    .children()
                    .filter(|n| n.is_element() && n.has_tag_name("task"))
                    .map(inner_xml_of)
                    .map(|inner| extract_fields(&inner))
                    .collect();
                if !found.is_empty() {
                    return found;
                }
            }
            let bare: Vec<ParsedSubtask> = root
                .descendants()
                .filter(|n| n.is_element() && n.has_tag_name("task"))
                .map(|n| inner_xml_of(n))
                .map(|inner| extract_fields(&inner))
                .collect();
            if !bare.is_empty() {
                return bare;
            }
            regex_scrape(xml)
        }
        Err(_) => regex_scrape(xml),
    }
}

/// Re-serializes a `<task>` node's children so nested tags (`<description>`,
/// `<dependencies>`, ...) survive into `extract_fields`, instead of just its
/// flattened text.
fn inner_xml_of(node: roxmltree::Node) -> String {
    if node.children().any(|c| c.is_element()) {
        node.children()
            .filter_map(|c| {
                if c.is_element() {
                    let tag = c.tag_name().name();
                    let text = c.text().unwrap_or_default();
                    Some(format!("<{tag}>{text}</{tag}>"))
                } else {
                    c.text().map(|t| t.to_string())
                }
            })
            .collect()
    } else {
        node.text().unwrap_or_default().to_string()
    }
}

#[cfg(test)]
#[path = "xml_parse_tests.rs"]
mod tests;
