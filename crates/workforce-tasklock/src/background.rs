// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Registry of cooperative background tasks associated with a project.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Tracks the background tasks spawned for one project (the SSE adapter's
/// action-queue reader, in-flight subtask activities, etc). `cleanup` aborts
/// every tracked task exactly once; calling it again is a no-op.
#[derive(Default)]
pub struct BackgroundTasks {
    handles: Mutex<Vec<JoinHandle<()>>>,
    cleaned_up: AtomicBool,
}

impl BackgroundTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, handle: JoinHandle<()>) {
        self.handles.lock().push(handle);
    }

    pub fn count(&self) -> usize {
        self.handles.lock().len()
    }

    /// Aborts every tracked handle and clears the set. Idempotent: a second
    /// call observes an already-cleaned registry and does nothing.
    pub fn cleanup(&self) {
        if self.cleaned_up.swap(true, Ordering::SeqCst) {
            return;
        }
        let mut handles = self.handles.lock();
        for handle in handles.drain(..) {
            handle.abort();
        }
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.cleaned_up.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "background_tests.rs"]
mod tests;
