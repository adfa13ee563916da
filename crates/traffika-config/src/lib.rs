// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Traffika bot.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides via the `TRAFFIKA_` prefix.
//!
//! # Usage
//!
//! ```no_run
//! use traffika_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("bot name: {}", config.agent.name);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::TraffikaConfig;
pub use validation::ConfigIssue;

/// Load configuration from the XDG hierarchy and validate it.
///
/// Returns either a valid [`TraffikaConfig`] or the list of issues found.
pub fn load_and_validate() -> Result<TraffikaConfig, Vec<ConfigIssue>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigIssue::from_figment(err)]),
    }
}

/// Load configuration from a TOML string and validate it. Used in tests
/// and by `traffika config`.
pub fn load_and_validate_str(toml_content: &str) -> Result<TraffikaConfig, Vec<ConfigIssue>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigIssue::from_figment(err)]),
    }
}

/// Print configuration issues to stderr, one per line.
pub fn render_errors(issues: &[ConfigIssue]) {
    for issue in issues {
        eprintln!("error: {issue}");
    }
}
