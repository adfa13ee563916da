// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing: commands, callback tokens, and free text into the workflow
//! engine, entity store, and request runner.
//!
//! Everything here is transport-free and returns [`Outbound`] values;
//! the channel in `lib.rs` does the actual Telegram delivery.

use std::sync::Arc;

use tracing::{error, warn};

use traffika_attribution::AttributionClient;
use traffika_core::{EntityStore, Role, TraffikaError};
use traffika_workflow::{EngineReply, FlowInput, FlowKind, FlowOutcome, WorkflowEngine};

use crate::commands::Command;
use crate::render;
use crate::runner;

/// What the bot wants to send back for one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text(String),
    Keyboard {
        text: String,
        rows: Vec<Vec<(String, String)>>,
    },
    Photo {
        bytes: Vec<u8>,
        caption: String,
    },
    Document {
        bytes: Vec<u8>,
        filename: String,
        caption: String,
    },
}

impl Outbound {
    fn text(text: impl Into<String>) -> Self {
        Outbound::Text(text.into())
    }
}

/// Shared dependencies of the chat surface.
pub struct BotDeps {
    pub store: Arc<dyn EntityStore>,
    pub engine: WorkflowEngine,
    /// `None` when no attribution API key is configured; analytics and
    /// reports are then refused with a message instead of a fetch.
    pub attribution: Option<AttributionClient>,
}

impl BotDeps {
    pub fn new(
        store: Arc<dyn EntityStore>,
        attribution: Option<AttributionClient>,
    ) -> Self {
        Self {
            engine: WorkflowEngine::new(store.clone()),
            store,
            attribution,
        }
    }
}

/// Handle one text message: a command, or input for the active flow.
pub async fn handle_text(
    deps: &BotDeps,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
    text: &str,
) -> Outbound {
    if let Some(command) = Command::parse(text) {
        return handle_command(deps, user_id, username, first_name, command).await;
    }

    if text.trim_start().starts_with('/') {
        return Outbound::text("Unknown command. Type /help to see what I can do.");
    }

    // Free text goes to the active flow, if any.
    match deps
        .engine
        .handle(user_id, FlowInput::Text(text.to_string()))
        .await
    {
        Ok(reply) => render_engine_reply(deps, user_id, reply).await,
        Err(err) => report_error(user_id, err),
    }
}

/// Handle one callback-button press.
pub async fn handle_callback(deps: &BotDeps, user_id: i64, data: &str) -> Outbound {
    if let Some(outbound) = handle_entity_callback(deps, user_id, data).await {
        return outbound;
    }

    // Flow-scoped tokens go to the active flow.
    match deps
        .engine
        .handle(user_id, FlowInput::Choice(data.to_string()))
        .await
    {
        Ok(reply) => render_engine_reply(deps, user_id, reply).await,
        Err(err) => report_error(user_id, err),
    }
}

async fn handle_command(
    deps: &BotDeps,
    user_id: i64,
    username: Option<&str>,
    first_name: &str,
    command: Command,
) -> Outbound {
    match command {
        Command::Start => {
            // Register the user so role lookups and grants can find them.
            let username = username.unwrap_or(first_name);
            if let Err(err) = deps.store.create_user(user_id, username, Role::Partner).await {
                return report_error(user_id, err);
            }
            Outbound::text(render::greeting(first_name))
        }
        Command::Help => Outbound::text(render::help_text()),
        Command::Offers => match deps.store.list_offers().await {
            Ok(offers) if offers.is_empty() => Outbound::text("No active offers."),
            Ok(offers) => {
                let role = match deps.store.user_role(user_id).await {
                    Ok(role) => role,
                    Err(err) => return report_error(user_id, err),
                };
                Outbound::Keyboard {
                    text: "Active offers:".to_string(),
                    rows: render::offers_keyboard(&offers, role),
                }
            }
            Err(err) => report_error(user_id, err),
        },
        Command::Sources => match deps.store.list_sources().await {
            Ok(sources) if sources.is_empty() => Outbound::text("No traffic sources."),
            Ok(sources) => {
                let role = match deps.store.user_role(user_id).await {
                    Ok(role) => role,
                    Err(err) => return report_error(user_id, err),
                };
                Outbound::Keyboard {
                    text: "Traffic sources:".to_string(),
                    rows: render::sources_keyboard(&sources, role),
                }
            }
            Err(err) => report_error(user_id, err),
        },
        Command::AddOffer => start_flow(deps, user_id, FlowKind::CreateOffer).await,
        Command::AddSource => start_flow(deps, user_id, FlowKind::CreateSource).await,
        Command::Report => start_flow(deps, user_id, FlowKind::Report).await,
        Command::Analyze => start_flow(deps, user_id, FlowKind::Analysis).await,
        Command::GrantAdmin { username } => {
            grant_admin(deps, user_id, username.as_deref()).await
        }
        Command::Cancel => render_engine_reply(deps, user_id, deps.engine.cancel(user_id)).await,
    }
}

async fn start_flow(deps: &BotDeps, user_id: i64, kind: FlowKind) -> Outbound {
    match deps.engine.start(user_id, kind).await {
        Ok(reply) => render_engine_reply(deps, user_id, reply).await,
        Err(err) => report_error(user_id, err),
    }
}

async fn grant_admin(deps: &BotDeps, user_id: i64, username: Option<&str>) -> Outbound {
    match deps.store.user_role(user_id).await {
        Ok(Role::Admin) => {}
        Ok(_) => {
            warn!(user_id, "grant_admin rejected for non-admin");
            return Outbound::text(render::error_message(&TraffikaError::Authorization));
        }
        Err(err) => return report_error(user_id, err),
    }

    let Some(username) = username else {
        return Outbound::text("Usage: /grant_admin @username");
    };

    match deps.store.set_user_role(username, Role::Admin).await {
        Ok(true) => Outbound::text(format!("User @{username} has been granted admin rights.")),
        Ok(false) => Outbound::text("User not found."),
        Err(err) => report_error(user_id, err),
    }
}

/// Entity list callbacks: `offer_view_7`, `source_delete_3`, ...
/// Returns `None` when the token is not an entity callback.
async fn handle_entity_callback(
    deps: &BotDeps,
    user_id: i64,
    data: &str,
) -> Option<Outbound> {
    let (entity, rest) = if let Some(rest) = data.strip_prefix("offer_") {
        ("offer", rest)
    } else if let Some(rest) = data.strip_prefix("source_") {
        ("source", rest)
    } else {
        return None;
    };

    let (action, id) = rest.split_once('_')?;
    let id: i64 = id.parse().ok()?;

    let outbound = match (entity, action) {
        ("offer", "view") => match deps.store.get_offer(id).await {
            Ok(Some(offer)) => Outbound::text(render::offer_details(&offer)),
            Ok(None) => Outbound::text("Offer not found."),
            Err(err) => report_error(user_id, err),
        },
        ("source", "view") => match deps.store.get_source(id).await {
            Ok(Some(source)) => Outbound::text(render::source_details(&source)),
            Ok(None) => Outbound::text("Source not found."),
            Err(err) => report_error(user_id, err),
        },
        ("offer", "edit") => {
            start_flow(deps, user_id, FlowKind::EditOffer { offer_id: id }).await
        }
        ("source", "edit") => {
            start_flow(deps, user_id, FlowKind::EditSource { source_id: id }).await
        }
        ("offer", "delete") => delete_entity(deps, user_id, "offer", id).await,
        ("source", "delete") => delete_entity(deps, user_id, "source", id).await,
        _ => return None,
    };
    Some(outbound)
}

async fn delete_entity(
    deps: &BotDeps,
    user_id: i64,
    entity: &'static str,
    id: i64,
) -> Outbound {
    match deps.store.user_role(user_id).await {
        Ok(Role::Admin) => {}
        Ok(_) => {
            warn!(user_id, entity, id, "delete rejected for non-admin");
            return Outbound::text(render::error_message(&TraffikaError::Authorization));
        }
        Err(err) => return report_error(user_id, err),
    }

    let result = match entity {
        "offer" => deps.store.delete_offer(id).await,
        _ => deps.store.delete_source(id).await,
    };
    match result {
        Ok(0) => Outbound::text(format!("{entity} {id} not found.")),
        Ok(_) => Outbound::text(format!("Deleted {entity} {id}.")),
        Err(err) => report_error(user_id, err),
    }
}

/// Map an engine reply to an outbound message, executing handed-off
/// analysis and report requests.
async fn render_engine_reply(deps: &BotDeps, user_id: i64, reply: EngineReply) -> Outbound {
    match reply {
        EngineReply::Prompt(prompt) => {
            if prompt.options.is_empty() {
                Outbound::Text(prompt.text)
            } else {
                // One button per row keeps long labels readable.
                Outbound::Keyboard {
                    text: prompt.text,
                    rows: prompt
                        .options
                        .into_iter()
                        .map(|option| vec![option])
                        .collect(),
                }
            }
        }
        EngineReply::Finished(message) | EngineReply::Rejected(message) => {
            Outbound::Text(message)
        }
        EngineReply::Handoff(outcome) => {
            let Some(client) = deps.attribution.as_ref() else {
                return Outbound::text(
                    "Analytics are disabled: no attribution API key configured.",
                );
            };
            let result = match &outcome {
                FlowOutcome::Analysis(request) => {
                    runner::run_analysis(deps.store.as_ref(), client, request).await
                }
                FlowOutcome::Report(request) => {
                    runner::run_report(deps.store.as_ref(), client, request).await
                }
            };
            match result {
                Ok(outbound) => outbound,
                Err(err) => report_error(user_id, err),
            }
        }
    }
}

fn report_error(user_id: i64, err: TraffikaError) -> Outbound {
    error!(user_id, error = %err, "request failed");
    Outbound::text(render::error_message(&err))
}
