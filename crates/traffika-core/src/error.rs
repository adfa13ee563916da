// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Traffika bot.

use thiserror::Error;

/// The primary error type used across all Traffika crates.
///
/// The variants map one-to-one onto how the chat surface reacts:
/// `Validation` re-prompts the current workflow state, `Authorization`
/// rejects the command before any state is entered, `NotFound` and
/// `InsufficientData` end the current flow with a user-visible message,
/// and `Upstream` ends the flow with a generic failure message.
#[derive(Debug, Error)]
pub enum TraffikaError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed field input. The workflow re-prompts the same state.
    #[error("invalid input: {0}")]
    Validation(String),

    /// A non-admin invoked a privileged command.
    #[error("admin role required")]
    Authorization,

    /// Operation on an entity id that does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Analysis preconditions unmet (e.g. forecast range shorter than 5 days).
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Attribution fetch failure or timeout. Never retried automatically.
    #[error("upstream error: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Chat transport errors (send failure, malformed callback payload).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
