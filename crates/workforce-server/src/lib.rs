// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! workforce-server: the HTTP/SSE front door onto a `workforce-engine`
//! session — request routing, the SSE wire projection, and process-wide
//! configuration.

pub mod config;
pub mod error;
pub mod http;
pub mod sse;
pub mod state;
pub mod wire;

pub use config::RuntimeConfig;
pub use error::ApiError;
pub use sse::SseAdapter;
pub use state::{AppState, ProjectSession};
pub use wire::{project_action, project_event, WireEvent, WireFrame};
