// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! workforce-engine: planning, coordination, execution, scheduling, and failure
//! recovery for a collaboration session.

pub mod advisor;
pub mod coordinator;
pub mod pattern;
pub mod planner;
pub mod recovery;
pub mod scheduler;
pub mod worker_exec;
pub mod worker_factory;
pub mod xml_parse;

pub use advisor::{CapabilityMatchAdvisor, CollaborationAdvisor, NullAdvisor};
pub use coordinator::{Coordinator, LlmCoordinator};
pub use pattern::{CollaborationPattern, ExecutionPlan, Workforce};
pub use planner::{DecompositionResult, LlmPlanner, Planner, SubtaskDefinition};
pub use recovery::{
    FailureAnalysis, FailureAnalyzer, LlmFailureAnalyzer, QualityEvaluation, RecoveryEngine,
    RecoveryOutcome, RecoveryStrategy,
};
pub use scheduler::{
    classify_simple_question, looks_like_simple_question, Scheduler, SchedulerConfig,
    SchedulerOutcome, WorkerPool,
};
pub use worker_exec::WorkerExecutor;
pub use worker_factory::{TemplateWorkerFactory, WorkerFactory};
pub use xml_parse::{parse_subtasks_xml, ParsedSubtask};
