// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded FIFO action queue.

use std::collections::VecDeque;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{Mutex, Notify};
use tracing::warn;

use crate::action::ActionRecord;

pub const DEFAULT_CAPACITY: usize = 1000;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("action queue is full (capacity {capacity})")]
pub struct QueueFullError {
    pub capacity: usize,
}

/// Bounded FIFO of client actions. `put` rejects once at capacity; `get`
/// supports an optional timeout and is the queue's only suspension point.
pub struct ActionQueue {
    capacity: usize,
    inner: Mutex<VecDeque<ActionRecord>>,
    notify: Notify,
}

impl ActionQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
        }
    }

    pub async fn put(&self, record: ActionRecord) -> Result<(), QueueFullError> {
        let mut guard = self.inner.lock().await;
        if guard.len() >= self.capacity {
            warn!(capacity = self.capacity, "action queue full, rejecting action");
            return Err(QueueFullError {
                capacity: self.capacity,
            });
        }
        guard.push_back(record);
        drop(guard);
        self.notify.notify_one();
        Ok(())
    }

    /// Pops the oldest action, waiting up to `timeout` (or indefinitely if `None`)
    /// for one to arrive. Returns `None` on timeout.
    pub async fn get(&self, timeout: Option<Duration>) -> Option<ActionRecord> {
        loop {
            let mut guard = self.inner.lock().await;
            if let Some(record) = guard.pop_front() {
                return Some(record);
            }
            drop(guard);

            let wait = self.notify.notified();
            match timeout {
                Some(d) => {
                    if tokio::time::timeout(d, wait).await.is_err() {
                        return None;
                    }
                }
                None => wait.await,
            }
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Removes every queued action. Used by `cleanup`.
    pub async fn drain(&self) {
        self.inner.lock().await.clear();
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
