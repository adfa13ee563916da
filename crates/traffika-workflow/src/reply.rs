// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transport-agnostic input and reply types.
//!
//! The engine never sees a chat library type: the channel adapter maps
//! messages and button presses into [`FlowInput`] and renders
//! [`FlowReply`] options as an inline keyboard.

use traffika_core::{AnalysisRequest, ReportRequest};

/// One inbound user event. Advancing a flow consumes exactly one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowInput {
    /// Free-form message text.
    Text(String),
    /// A button press carrying its callback token.
    Choice(String),
}

/// One outbound prompt, optionally with `(label, callback token)` buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowReply {
    pub text: String,
    pub options: Vec<(String, String)>,
}

impl FlowReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Vec::new(),
        }
    }

    pub fn with_options(
        text: impl Into<String>,
        options: Vec<(String, String)>,
    ) -> Self {
        Self {
            text: text.into(),
            options,
        }
    }
}

/// A completed request the engine hands back to the caller for execution.
///
/// Fetching and rendering stay outside the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    Analysis(AnalysisRequest),
    Report(ReportRequest),
}

/// What the engine tells the channel adapter after each event.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    /// Flow continues; send this prompt.
    Prompt(FlowReply),
    /// Flow ended with a user-facing confirmation (commit, cancel, back).
    Finished(String),
    /// Flow ended by producing a request the caller must execute.
    Handoff(FlowOutcome),
    /// Nothing was started or advanced (authorization, busy, no active flow).
    Rejected(String),
}
