// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker factory: synthesises a new worker for CREATE_WORKER.

use std::collections::HashSet;
use std::sync::Arc;

use workforce_core::id::{IdGen, WorkerId};
use workforce_core::Worker;

/// Synthesises a `Worker` configured for a task's declared capability
/// requirements.
pub trait WorkerFactory: Send + Sync {
    fn create_worker(&self, required_capabilities: &[String]) -> Worker;
}

struct RoleTemplate {
    role: &'static str,
    capabilities: &'static [&'static str],
    description: &'static str,
}

const ROLE_TEMPLATES: &[RoleTemplate] = &[
    RoleTemplate {
        role: "researcher",
        capabilities: &["web_search", "document_parsing", "research"],
        description: "Gathers and synthesises information from external sources.",
    },
    RoleTemplate {
        role: "coder",
        capabilities: &["code_generation", "code_review", "rust", "python"],
        description: "Writes and reviews code.",
    },
    RoleTemplate {
        role: "writer",
        capabilities: &["writing", "summarization", "editing"],
        description: "Produces and edits prose output.",
    },
    RoleTemplate {
        role: "analyst",
        capabilities: &["data_analysis", "reasoning"],
        description: "Analyzes data and draws conclusions.",
    },
    RoleTemplate {
        role: "generalist",
        capabilities: &[],
        description: "A general-purpose worker with no specialised capabilities.",
    },
];

/// Picks the role template with the greatest capability overlap with the
/// requested set; falls back to the generalist template (last entry) when no
/// template overlaps at all.
pub struct TemplateWorkerFactory {
    id_gen: Arc<dyn IdGen>,
}

impl TemplateWorkerFactory {
    pub fn new(id_gen: Arc<dyn IdGen>) -> Self {
        Self { id_gen }
    }

    fn best_template(&self, required: &[String]) -> &'static RoleTemplate {
        let required: HashSet<&str> = required.iter().map(String::as_str).collect();
        let mut best = &ROLE_TEMPLATES[ROLE_TEMPLATES.len() - 1];
        let mut best_overlap = 0usize;
        for template in ROLE_TEMPLATES {
            let overlap = template.capabilities.iter().filter(|c| required.contains(*c)).count();
            if overlap > best_overlap {
                best_overlap = overlap;
                best = template;
            }
        }
        best
    }
}

impl WorkerFactory for TemplateWorkerFactory {
    fn create_worker(&self, required_capabilities: &[String]) -> Worker {
        let template = self.best_template(required_capabilities);
        let id = WorkerId::new(self.id_gen.next());
        let mut capabilities: HashSet<String> =
            template.capabilities.iter().map(|c| c.to_string()).collect();
        capabilities.extend(required_capabilities.iter().cloned());
        Worker::new(id, template.role).with_capabilities(capabilities).with_description(template.description)
    }
}

#[cfg(test)]
#[path = "worker_factory_tests.rs"]
mod tests;
