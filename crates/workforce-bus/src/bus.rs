// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Publish/subscribe event bus backed by the append-only event log.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::warn;

use crate::event::Event;
use crate::log::EventLog;

pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// A synchronous subscriber. Returning `Err` is logged and swallowed; it never
/// vetoes delivery to subsequent subscribers.
pub trait SyncSubscriber: Send + Sync {
    fn on_event(&self, event: &Event) -> Result<(), String>;
}

/// An asynchronous subscriber, awaited only on the `publish_async` path.
#[async_trait]
pub trait AsyncSubscriber: Send + Sync {
    async fn on_event(&self, event: &Event) -> Result<(), String>;
}

/// The in-process publish/subscribe substrate. Cheap to clone: all state is
/// shared behind `Arc`.
#[derive(Clone)]
pub struct EventBus {
    log: Arc<EventLog>,
    sync_subscribers: Arc<RwLock<Vec<Arc<dyn SyncSubscriber>>>>,
    async_subscribers: Arc<RwLock<Vec<Arc<dyn AsyncSubscriber>>>>,
    queue_tx: mpsc::Sender<Event>,
}

/// Consumes the bounded queue the SSE adapter reads from.
pub struct EventReader {
    queue_rx: mpsc::Receiver<Event>,
}

impl EventReader {
    pub async fn recv(&mut self) -> Option<Event> {
        self.queue_rx.recv().await
    }
}

impl EventBus {
    pub fn new(queue_capacity: usize) -> (Self, EventReader) {
        let (queue_tx, queue_rx) = mpsc::channel(queue_capacity.max(1));
        let bus = Self {
            log: Arc::new(EventLog::new()),
            sync_subscribers: Arc::new(RwLock::new(Vec::new())),
            async_subscribers: Arc::new(RwLock::new(Vec::new())),
            queue_tx,
        };
        (bus, EventReader { queue_rx })
    }

    pub fn subscribe_sync(&self, subscriber: Arc<dyn SyncSubscriber>) {
        self.sync_subscribers.write().push(subscriber);
    }

    pub fn subscribe_async(&self, subscriber: Arc<dyn AsyncSubscriber>) {
        self.async_subscribers.write().push(subscriber);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sync_subscribers.read().len() + self.async_subscribers.read().len()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    fn invoke_sync_subscribers(&self, event: &Event) {
        let subscribers = self.sync_subscribers.read().clone();
        for subscriber in subscribers.iter() {
            if let Err(err) = subscriber.on_event(event) {
                warn!(error = %err, action = ?event.action, "event subscriber failed");
            }
        }
    }

    fn enqueue(&self, event: Event) {
        if self.queue_tx.try_send(event).is_err() {
            warn!("event queue full, dropping event for SSE adapter");
        }
    }

    /// Synchronous publish: appends to the log, invokes sync subscribers, and
    /// enqueues for the SSE adapter. Never blocks.
    pub fn publish(&self, event: Event) -> u64 {
        let pos = self.log.append(event.clone());
        self.invoke_sync_subscribers(&event);
        self.enqueue(event);
        pos
    }

    /// Awaitable publish: as `publish`, plus awaits every async subscriber.
    pub async fn publish_async(&self, event: Event) -> u64 {
        let pos = self.log.append(event.clone());
        self.invoke_sync_subscribers(&event);
        let subscribers = self.async_subscribers.read().clone();
        for subscriber in subscribers.iter() {
            if let Err(err) = subscriber.on_event(&event).await {
                warn!(error = %err, action = ?event.action, "async event subscriber failed");
            }
        }
        self.enqueue(event);
        pos
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
