// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Traffika bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use serde::{Deserialize, Serialize};

/// Top-level Traffika configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TraffikaConfig {
    /// Bot identity and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Attribution service API settings.
    #[serde(default)]
    pub attribution: AttributionConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the bot.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "traffika".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram channel.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat identity of the bootstrap admin, seeded into the users table
    /// on first start.
    #[serde(default)]
    pub admin_user_id: Option<i64>,

    /// Username of the bootstrap admin.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_user_id: None,
            admin_username: default_admin_username(),
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_string()
}

/// Attribution service API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AttributionConfig {
    /// Bearer token for the attribution API. `None` disables analytics
    /// and report fetching.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the raw-data export API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timezone passed to every report request.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Per-request timeout in seconds. A fetch that exceeds this aborts
    /// the current flow; it is never retried.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timezone: default_timezone(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "https://hq1.appsflyer.com/api/raw-data/export/app".to_string()
}

fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    "traffika.db".to_string()
}
