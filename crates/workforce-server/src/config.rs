// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide runtime configuration, constructed once at startup and
//! threaded by reference. Every field is overridable via a `WORKFORCE_`
//! prefixed environment variable.

use std::time::Duration;

use workforce_engine::SchedulerConfig;

/// Runtime configuration for a `workforce-server` process.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub pool_size: usize,
    pub max_retries: u32,
    pub action_queue_capacity: usize,
    pub conversation_character_cap: usize,
    pub workflow_memory_capacity: usize,
    pub event_queue_capacity: usize,
    pub sse_heartbeat: Duration,
    pub stop_grace_period: Duration,
    pub quality_evaluation_enabled: bool,
    pub quality_threshold: u8,
    pub bind_addr: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            pool_size: 4,
            max_retries: 3,
            action_queue_capacity: workforce_tasklock::queue::DEFAULT_CAPACITY,
            conversation_character_cap: workforce_tasklock::conversation::DEFAULT_CHARACTER_CAP,
            workflow_memory_capacity: workforce_core::DEFAULT_WORKFLOW_MEMORY_CAPACITY,
            event_queue_capacity: workforce_bus::DEFAULT_QUEUE_CAPACITY,
            sse_heartbeat: Duration::from_secs(30),
            stop_grace_period: Duration::from_secs(1),
            quality_evaluation_enabled: false,
            quality_threshold: 70,
            bind_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Loads defaults, then applies any `WORKFORCE_*` environment overrides.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(v) = env_usize("WORKFORCE_POOL_SIZE") {
            config.pool_size = v;
        }
        if let Some(v) = env_u32("WORKFORCE_MAX_RETRIES") {
            config.max_retries = v;
        }
        if let Some(v) = env_usize("WORKFORCE_ACTION_QUEUE_CAPACITY") {
            config.action_queue_capacity = v;
        }
        if let Some(v) = env_usize("WORKFORCE_CONVERSATION_CHARACTER_CAP") {
            config.conversation_character_cap = v;
        }
        if let Some(v) = env_usize("WORKFORCE_WORKFLOW_MEMORY_CAPACITY") {
            config.workflow_memory_capacity = v;
        }
        if let Some(v) = env_usize("WORKFORCE_EVENT_QUEUE_CAPACITY") {
            config.event_queue_capacity = v;
        }
        if let Some(v) = env_u64("WORKFORCE_SSE_HEARTBEAT_MS") {
            config.sse_heartbeat = Duration::from_millis(v);
        }
        if let Some(v) = env_u64("WORKFORCE_STOP_GRACE_PERIOD_MS") {
            config.stop_grace_period = Duration::from_millis(v);
        }
        if let Ok(v) = std::env::var("WORKFORCE_QUALITY_EVALUATION_ENABLED") {
            config.quality_evaluation_enabled = v == "1" || v.eq_ignore_ascii_case("true");
        }
        if let Some(v) = std::env::var("WORKFORCE_QUALITY_THRESHOLD")
            .ok()
            .and_then(|s| s.parse::<u8>().ok())
        {
            config.quality_threshold = v;
        }
        if let Ok(v) = std::env::var("WORKFORCE_BIND_ADDR") {
            config.bind_addr = v;
        }

        config
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            pool_size: self.pool_size,
            max_retries: self.max_retries,
            stop_grace_period_ms: self.stop_grace_period.as_millis() as u64,
            quality_evaluation_enabled: self.quality_evaluation_enabled,
            quality_threshold: self.quality_threshold,
        }
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
