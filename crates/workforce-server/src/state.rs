// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared application state: one `TaskLockRegistry` plus a registry of live
//! project sessions (their event bus and stop signal), bundled into a single
//! `Arc` handlers clone cheaply from axum's `State` extractor.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex as SyncMutex;
use tokio::sync::Notify;

use workforce_bus::EventBus;
use workforce_core::id::SessionId;
use workforce_core::Clock;
use workforce_engine::{
    Coordinator, LlmCoordinator, LlmFailureAnalyzer, LlmPlanner, NullAdvisor, Planner,
    RecoveryEngine, TemplateWorkerFactory,
};
use workforce_providers::{FakeProvider, LlmProvider};
use workforce_tasklock::{TaskLock, TaskLockRegistry};

use crate::config::RuntimeConfig;

/// Live state for one in-progress (or completed) project. Created by `POST
/// /chat`; looked up by the other endpoints to enqueue control actions or
/// signal a stop.
pub struct ProjectSession {
    pub tasklock: Arc<TaskLock>,
    pub bus: EventBus,
    pub stop: Arc<Notify>,
}

/// Builds the `LlmProvider` a new project's workers and default responder are
/// bound to. Real model providers are an external collaborator this crate
/// does not implement — only `FakeProvider` ships here, so the default
/// factory below echoes the question back. Production deployments inject a
/// real factory here.
pub type ProviderFactory = Arc<dyn Fn(&str) -> Arc<dyn LlmProvider> + Send + Sync>;

pub fn default_provider_factory() -> ProviderFactory {
    Arc::new(|question: &str| {
        Arc::new(FakeProvider::echo("default-provider", format!("Acknowledged: {question}"))) as Arc<dyn LlmProvider>
    })
}

/// Process-wide state. The hook pipeline is deliberately absent here: it
/// binds to a per-project `EventBus` that does not exist until `POST /chat`
/// creates one, so `start_chat` builds and registers it fresh per project
/// rather than sharing one built at startup.
pub struct AppState {
    pub config: RuntimeConfig,
    pub tasklocks: Arc<TaskLockRegistry>,
    pub sessions: SyncMutex<HashMap<SessionId, Arc<ProjectSession>>>,
    pub planner: Arc<dyn Planner>,
    pub coordinator: Arc<dyn Coordinator>,
    pub recovery: Arc<RecoveryEngine>,
    pub clock: Arc<dyn Clock>,
    pub provider_factory: ProviderFactory,
}

impl AppState {
    pub fn new(config: RuntimeConfig, clock: Arc<dyn Clock>, provider_factory: ProviderFactory) -> Arc<Self> {
        let planner_provider = provider_factory("planner bootstrap");
        let coordinator_provider = provider_factory("coordinator bootstrap");
        let analyzer_provider = provider_factory("recovery bootstrap");

        let planner: Arc<dyn Planner> = Arc::new(LlmPlanner::new(planner_provider));
        let coordinator: Arc<dyn Coordinator> =
            Arc::new(LlmCoordinator::new(coordinator_provider).with_advisor(Arc::new(NullAdvisor)));
        let analyzer = Arc::new(LlmFailureAnalyzer::new(analyzer_provider));
        let factory = Arc::new(TemplateWorkerFactory::new(Arc::new(workforce_core::id::UuidIdGen)));
        let recovery = Arc::new(RecoveryEngine::new(analyzer, planner.clone(), factory));

        Arc::new(Self {
            config,
            tasklocks: Arc::new(TaskLockRegistry::new()),
            sessions: SyncMutex::new(HashMap::new()),
            planner,
            coordinator,
            recovery,
            clock,
            provider_factory,
        })
    }

    pub fn register_session(&self, project_id: SessionId, session: Arc<ProjectSession>) {
        self.sessions.lock().insert(project_id, session);
    }

    pub fn session(&self, project_id: &SessionId) -> Option<Arc<ProjectSession>> {
        self.sessions.lock().get(project_id).cloned()
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
