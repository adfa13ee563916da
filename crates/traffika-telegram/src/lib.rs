// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for the Traffika bot.
//!
//! Connects via long polling, routes messages and callback queries
//! through the transport-free handler, and delivers text, keyboards,
//! chart photos, and report documents.

pub mod commands;
pub mod handler;
pub mod render;
pub mod runner;

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ChatKind, InlineKeyboardButton, InlineKeyboardMarkup, InputFile};
use tracing::{debug, error, info};

use traffika_config::model::TelegramConfig;
use traffika_core::TraffikaError;

pub use handler::{BotDeps, Outbound};

/// Telegram channel for the Traffika bot.
pub struct TelegramChannel {
    bot: Bot,
    deps: Arc<BotDeps>,
}

impl TelegramChannel {
    /// Creates the channel. Requires `config.bot_token` to be set.
    pub fn new(config: &TelegramConfig, deps: Arc<BotDeps>) -> Result<Self, TraffikaError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            TraffikaError::Config("telegram.bot_token is required for the Telegram channel".into())
        })?;
        if token.is_empty() {
            return Err(TraffikaError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }
        Ok(Self {
            bot: Bot::new(token),
            deps,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    /// Run long polling until shutdown. One update is handled at a time
    /// per chat; an in-flight attribution fetch blocks only that event.
    pub async fn run(self) {
        info!("starting Telegram long polling");

        let deps = self.deps;

        let message_branch = Update::filter_message().endpoint({
            let deps = deps.clone();
            move |bot: Bot, msg: Message| {
                let deps = deps.clone();
                async move {
                    if !is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }
                    let Some(user) = msg.from.as_ref() else {
                        return respond(());
                    };
                    let Some(text) = msg.text() else {
                        debug!(msg_id = msg.id.0, "ignoring non-text message");
                        return respond(());
                    };

                    let user_id = user.id.0 as i64;
                    let outbound = handler::handle_text(
                        &deps,
                        user_id,
                        user.username.as_deref(),
                        &user.first_name,
                        text,
                    )
                    .await;

                    if let Err(e) = deliver(&bot, msg.chat.id, outbound).await {
                        error!(error = %e, "failed to deliver reply");
                    }
                    respond(())
                }
            }
        });

        let callback_branch = Update::filter_callback_query().endpoint({
            let deps = deps.clone();
            move |bot: Bot, query: CallbackQuery| {
                let deps = deps.clone();
                async move {
                    // Stop the client-side spinner regardless of the outcome.
                    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
                        debug!(error = %e, "failed to answer callback query");
                    }

                    let Some(data) = query.data.as_deref() else {
                        return respond(());
                    };
                    let Some(chat_id) = query.message.as_ref().map(|m| m.chat().id) else {
                        return respond(());
                    };

                    let user_id = query.from.id.0 as i64;
                    let outbound = handler::handle_callback(&deps, user_id, data).await;

                    if let Err(e) = deliver(&bot, chat_id, outbound).await {
                        error!(error = %e, "failed to deliver reply");
                    }
                    respond(())
                }
            }
        });

        let tree = teloxide::dptree::entry()
            .branch(message_branch)
            .branch(callback_branch);

        Dispatcher::builder(self.bot, tree)
            .default_handler(|_| async {}) // Silently ignore other update kinds
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }
}

/// Whether the message is from a private (DM) chat.
fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Build an inline keyboard from `(label, callback data)` rows.
fn make_keyboard(rows: Vec<Vec<(String, String)>>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(rows.into_iter().map(|row| {
        row.into_iter()
            .map(|(label, data)| InlineKeyboardButton::callback(label, data))
            .collect::<Vec<_>>()
    }))
}

/// Send one outbound artifact to the chat.
async fn deliver(bot: &Bot, chat_id: ChatId, outbound: Outbound) -> Result<(), TraffikaError> {
    let channel_err = |e: teloxide::RequestError| TraffikaError::Channel {
        message: format!("failed to send message: {e}"),
        source: Some(Box::new(e)),
    };

    match outbound {
        Outbound::Text(text) => {
            bot.send_message(chat_id, text).await.map_err(channel_err)?;
        }
        Outbound::Keyboard { text, rows } => {
            bot.send_message(chat_id, text)
                .reply_markup(make_keyboard(rows))
                .await
                .map_err(channel_err)?;
        }
        Outbound::Photo { bytes, caption } => {
            bot.send_photo(chat_id, InputFile::memory(bytes).file_name("chart.png"))
                .caption(caption)
                .await
                .map_err(channel_err)?;
        }
        Outbound::Document {
            bytes,
            filename,
            caption,
        } => {
            bot.send_document(chat_id, InputFile::memory(bytes).file_name(filename))
                .caption(caption)
                .await
                .map_err(channel_err)?;
        }
    }
    Ok(())
}
