// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! SSE adapter: given a project's TaskLock and the session's event bus,
//! yields `data: {json}\n\n` text frames to the client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use workforce_bus::EventReader;
use workforce_tasklock::TaskLock;

use crate::wire::{project_action, project_event, WireEvent, WireFrame};

pub const FRAME_BUFFER: usize = 64;

/// Drives one client's stream for a project. A background task drains the
/// TaskLock action queue into a local channel (point 1 of the contract); the
/// main loop races that channel against the event bus and a heartbeat timer
/// (points 2-4); the background task is aborted when the stream ends for any
/// reason, including the receiver being dropped (point 5 — no leaked
/// background activity).
pub struct SseAdapter {
    heartbeat: Duration,
}

impl SseAdapter {
    pub fn new(heartbeat: Duration) -> Self {
        Self { heartbeat }
    }

    /// Returns a stream of rendered frame text. Ends after an `end`/`error`
    /// frame is emitted, or when the event bus itself closes.
    pub fn stream(&self, mut reader: EventReader, tasklock: Arc<TaskLock>) -> ReceiverStream<String> {
        let (tx, rx) = mpsc::channel(FRAME_BUFFER);
        let heartbeat = self.heartbeat;

        tokio::spawn(async move {
            let (action_tx, mut action_rx) = mpsc::channel(FRAME_BUFFER);
            let background = tokio::spawn({
                let tasklock = tasklock.clone();
                async move {
                    loop {
                        let Some(record) = tasklock.action_queue.get(None).await else {
                            break;
                        };
                        if action_tx.send(record).await.is_err() {
                            break;
                        }
                    }
                }
            });

            loop {
                tokio::select! {
                    event = reader.recv() => {
                        let Some(event) = event else { break };
                        let Some(frame) = project_event(&event) else { continue };
                        let terminal = matches!(frame.step, WireEvent::End | WireEvent::Error);
                        if tx.send(frame.to_sse_text()).await.is_err() || terminal {
                            break;
                        }
                    }
                    action = action_rx.recv() => {
                        let Some(record) = action else { break };
                        if let Some(frame) = project_action(&record) {
                            if tx.send(frame.to_sse_text()).await.is_err() {
                                break;
                            }
                        }
                    }
                    _ = tokio::time::sleep(heartbeat) => {
                        if tx.send(WireFrame::heartbeat().to_sse_text()).await.is_err() {
                            break;
                        }
                    }
                }
            }

            background.abort();
        });

        ReceiverStream::new(rx)
    }
}

#[cfg(test)]
#[path = "sse_tests.rs"]
mod tests;
