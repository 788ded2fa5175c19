// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! workforce-bus: the in-process event bus, its append-only log, and the hook
//! pipeline that surfaces model/tool invocations as events.

pub mod bus;
pub mod event;
pub mod hooks;
pub mod log;

pub use bus::{AsyncSubscriber, EventBus, EventReader, SyncSubscriber, DEFAULT_QUEUE_CAPACITY};
pub use event::{Event, WorkforceAction};
pub use hooks::{
    AfterModelHook, AfterToolHook, BeforeModelHook, BeforeToolHook, EventPublishingModelHook,
    EventPublishingToolHook, HookPipeline, ModelCallContext, ModelCallOutcome, ToolCallContext,
    ToolCallOutcome,
};
pub use log::EventLog;
