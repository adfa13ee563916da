// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./traffika.toml` > `~/.config/traffika/traffika.toml`
//! > `/etc/traffika/traffika.toml` with environment variable overrides via
//! the `TRAFFIKA_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::TraffikaConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/traffika/traffika.toml` (system-wide)
/// 3. `~/.config/traffika/traffika.toml` (user XDG config)
/// 4. `./traffika.toml` (local directory)
/// 5. `TRAFFIKA_*` environment variables
pub fn load_config() -> Result<TraffikaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TraffikaConfig::default()))
        .merge(Toml::file("/etc/traffika/traffika.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("traffika/traffika.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("traffika.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
pub fn load_config_from_str(toml_content: &str) -> Result<TraffikaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TraffikaConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<TraffikaConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(TraffikaConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TRAFFIKA_TELEGRAM_BOT_TOKEN` must map
/// to `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("TRAFFIKA_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: TRAFFIKA_TELEGRAM_BOT_TOKEN -> "telegram_bot_token"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("telegram_", "telegram.", 1)
            .replacen("attribution_", "attribution.", 1)
            .replacen("storage_", "storage.", 1);
        mapped.into()
    })
}
