// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multi-step conversation engine for the Traffika bot.
//!
//! Drives per-user, per-command finite state machines that collect or
//! edit a structured entity field-by-field. Creation flows are
//! straight-line sequences; edit flows are a menu loop; analysis and
//! report flows collect request parameters and hand the finished request
//! back to the caller. The engine performs no chat I/O: it consumes
//! [`FlowInput`] values and emits [`FlowReply`] prompts, leaving the
//! transport to the channel adapter.

pub mod draft;
pub mod engine;
pub mod flows;
pub mod reply;
pub mod validators;

pub use engine::{FlowKind, WorkflowEngine};
pub use reply::{EngineReply, FlowInput, FlowOutcome, FlowReply};
