// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-agent human-input queues: delivers client-supplied answers to
//! agent-initiated `ask` prompts.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::Notify;

struct AgentQueue {
    answers: Mutex<VecDeque<String>>,
    notify: Notify,
}

impl AgentQueue {
    fn new() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }
}

/// Lazily creates one FIFO per agent name. A worker's read from its queue
/// blocks until the client posts a matching answer through a control action.
#[derive(Default)]
pub struct HumanInputRegistry {
    queues: Mutex<HashMap<String, Arc<AgentQueue>>>,
}

impl HumanInputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn queue_for(&self, agent_name: &str) -> Arc<AgentQueue> {
        let mut queues = self.queues.lock();
        queues
            .entry(agent_name.to_string())
            .or_insert_with(|| Arc::new(AgentQueue::new()))
            .clone()
    }

    pub fn submit_answer(&self, agent_name: &str, answer: String) {
        let queue = self.queue_for(agent_name);
        queue.answers.lock().push_back(answer);
        queue.notify.notify_one();
    }

    /// Awaits the next answer posted for `agent_name`. Never times out: the
    /// caller is expected to race this against cancellation if needed.
    pub async fn next_answer(&self, agent_name: &str) -> String {
        let queue = self.queue_for(agent_name);
        loop {
            if let Some(answer) = queue.answers.lock().pop_front() {
                return answer;
            }
            queue.notify.notified().await;
        }
    }

    pub fn known_agents(&self) -> usize {
        self.queues.lock().len()
    }
}

#[cfg(test)]
#[path = "human_input_tests.rs"]
mod tests;
