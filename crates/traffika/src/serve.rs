// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `traffika serve` command implementation.
//!
//! Opens storage, seeds the bootstrap admin, builds the attribution
//! client and the chat dependencies, and runs the Telegram channel
//! until shutdown.

use std::sync::Arc;

use tracing::{info, warn};

use traffika_attribution::AttributionClient;
use traffika_config::TraffikaConfig;
use traffika_core::{EntityStore, TraffikaError};
use traffika_storage::SqliteStore;
use traffika_telegram::{BotDeps, TelegramChannel};

/// Runs the `traffika serve` command.
pub async fn run_serve(config: TraffikaConfig) -> Result<(), TraffikaError> {
    init_tracing(&config.agent.log_level);
    info!(name = %config.agent.name, "starting traffika serve");

    // Storage first: everything else depends on it.
    let store = SqliteStore::new(config.storage.clone());
    store.initialize().await?;

    match config.telegram.admin_user_id {
        Some(admin_id) => {
            store
                .seed_admin(admin_id, &config.telegram.admin_username)
                .await?;
            info!(admin_id, "bootstrap admin seeded");
        }
        None => {
            warn!("telegram.admin_user_id not set; no bootstrap admin seeded");
        }
    }

    // Analytics run only with an API key; the bot still manages entities
    // without one.
    let attribution = match AttributionClient::new(&config.attribution) {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "attribution client disabled");
            None
        }
    };

    let store: Arc<dyn EntityStore> = Arc::new(store);
    let deps = Arc::new(BotDeps::new(store, attribution));

    let channel = TelegramChannel::new(&config.telegram, deps)?;
    channel.run().await;

    info!("traffika serve stopped");
    Ok(())
}

/// Print the effective configuration with secrets redacted.
pub fn print_config(config: &TraffikaConfig) {
    let mut redacted = config.clone();
    if redacted.telegram.bot_token.is_some() {
        redacted.telegram.bot_token = Some("***".to_string());
    }
    if redacted.attribution.api_key.is_some() {
        redacted.attribution.api_key = Some("***".to_string());
    }
    match toml::to_string_pretty(&redacted) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("error: failed to render config: {e}"),
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("traffika={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_config_redacts_secrets() {
        let mut config = TraffikaConfig::default();
        config.telegram.bot_token = Some("123:secret".to_string());
        config.attribution.api_key = Some("sk-secret".to_string());

        let mut redacted = config.clone();
        redacted.telegram.bot_token = Some("***".to_string());
        redacted.attribution.api_key = Some("***".to_string());

        let rendered = toml::to_string_pretty(&redacted).unwrap();
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }
}
