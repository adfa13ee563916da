// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of the configuration model.

use crate::model::TraffikaConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single configuration problem, rendered as `key: message`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub key: String,
    pub message: String,
}

impl ConfigIssue {
    pub(crate) fn new(key: &str, message: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn from_figment(err: figment::Error) -> Self {
        let key = if err.path.is_empty() {
            "<config>".to_string()
        } else {
            err.path.join(".")
        };
        Self {
            key,
            message: err.kind.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.key, self.message)
    }
}

/// Check constraints Figment cannot express. Collects every problem
/// instead of stopping at the first.
pub fn validate_config(config: &TraffikaConfig) -> Result<(), Vec<ConfigIssue>> {
    let mut issues = Vec::new();

    if !LOG_LEVELS.contains(&config.agent.log_level.as_str()) {
        issues.push(ConfigIssue::new(
            "agent.log_level",
            format!(
                "must be one of {LOG_LEVELS:?}, got {:?}",
                config.agent.log_level
            ),
        ));
    }

    if let Some(token) = &config.telegram.bot_token
        && token.is_empty()
    {
        issues.push(ConfigIssue::new(
            "telegram.bot_token",
            "must not be empty when set",
        ));
    }

    if config.telegram.admin_username.is_empty() {
        issues.push(ConfigIssue::new(
            "telegram.admin_username",
            "must not be empty",
        ));
    }

    if config.attribution.timeout_secs == 0 {
        issues.push(ConfigIssue::new(
            "attribution.timeout_secs",
            "must be at least 1",
        ));
    }

    if config.attribution.base_url.is_empty() {
        issues.push(ConfigIssue::new("attribution.base_url", "must not be empty"));
    }

    if config.storage.database_path.is_empty() {
        issues.push(ConfigIssue::new("storage.database_path", "must not be empty"));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&TraffikaConfig::default()).is_ok());
    }

    #[test]
    fn bad_log_level_is_reported() {
        let mut config = TraffikaConfig::default();
        config.agent.log_level = "verbose".into();
        let issues = validate_config(&config).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].key, "agent.log_level");
    }

    #[test]
    fn empty_token_and_zero_timeout_are_both_reported() {
        let mut config = TraffikaConfig::default();
        config.telegram.bot_token = Some(String::new());
        config.attribution.timeout_secs = 0;
        let issues = validate_config(&config).unwrap_err();
        let keys: Vec<_> = issues.iter().map(|i| i.key.as_str()).collect();
        assert!(keys.contains(&"telegram.bot_token"));
        assert!(keys.contains(&"attribution.timeout_secs"));
    }
}
