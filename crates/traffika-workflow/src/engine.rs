// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The workflow engine: a per-user session map over the flow state machines.
//!
//! One inbound chat event is fully handled before the next is dispatched
//! for the same conversation, so the engine can take a flow out of the
//! map, advance it, and put it back without further locking. Different
//! users' flows never touch the same entry.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, warn};

use traffika_core::{EntityStore, Role, TraffikaError};

use crate::flows::{analysis, create, edit, report, ActiveFlow, FlowProgress};
use crate::reply::{EngineReply, FlowInput};

/// Which conversation to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    CreateOffer,
    CreateSource,
    EditOffer { offer_id: i64 },
    EditSource { source_id: i64 },
    Analysis,
    Report,
}

impl FlowKind {
    /// Creation, editing, and report generation are admin-only;
    /// analysis is open to every known user.
    fn requires_admin(self) -> bool {
        !matches!(self, FlowKind::Analysis)
    }
}

/// Drives all active conversations, keyed by chat user identity.
pub struct WorkflowEngine {
    store: Arc<dyn EntityStore>,
    sessions: DashMap<i64, ActiveFlow>,
}

impl WorkflowEngine {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self {
            store,
            sessions: DashMap::new(),
        }
    }

    /// Whether the user currently has a flow in progress.
    pub fn has_active(&self, user_id: i64) -> bool {
        self.sessions.contains_key(&user_id)
    }

    /// Start a flow for the user.
    ///
    /// Rejected when the user lacks the required role, and rejected when
    /// another flow is already active: a started draft is never silently
    /// overwritten.
    pub async fn start(
        &self,
        user_id: i64,
        kind: FlowKind,
    ) -> Result<EngineReply, TraffikaError> {
        if self.sessions.contains_key(&user_id) {
            return Ok(EngineReply::Rejected(
                "Another operation is already in progress. Finish it or send /cancel first."
                    .to_string(),
            ));
        }

        if kind.requires_admin() {
            let role = self.store.user_role(user_id).await?;
            if role != Role::Admin {
                warn!(user_id, ?kind, "privileged flow rejected for non-admin");
                return Ok(EngineReply::Rejected(
                    "You don't have permission to perform this action.".to_string(),
                ));
            }
        }

        let (flow, reply) = match kind {
            FlowKind::CreateOffer => {
                let (flow, reply) = create::OfferCreateFlow::start();
                (ActiveFlow::CreateOffer(flow), reply)
            }
            FlowKind::CreateSource => {
                let (flow, reply) = create::SourceCreateFlow::start();
                (ActiveFlow::CreateSource(flow), reply)
            }
            FlowKind::EditOffer { offer_id } => {
                let offer = self.store.get_offer(offer_id).await?.ok_or(
                    TraffikaError::NotFound {
                        entity: "offer",
                        id: offer_id,
                    },
                )?;
                let (flow, reply) = edit::OfferEditFlow::start(offer);
                (ActiveFlow::EditOffer(flow), reply)
            }
            FlowKind::EditSource { source_id } => {
                let source = self.store.get_source(source_id).await?.ok_or(
                    TraffikaError::NotFound {
                        entity: "source",
                        id: source_id,
                    },
                )?;
                let (flow, reply) = edit::SourceEditFlow::start(source);
                (ActiveFlow::EditSource(flow), reply)
            }
            FlowKind::Analysis => {
                let (flow, reply) = analysis::AnalysisFlow::start();
                (ActiveFlow::Analysis(flow), reply)
            }
            FlowKind::Report => {
                let (flow, reply) = report::ReportFlow::start();
                (ActiveFlow::Report(flow), reply)
            }
        };

        debug!(user_id, ?kind, "flow started");
        self.sessions.insert(user_id, flow);
        Ok(EngineReply::Prompt(reply))
    }

    /// Route one input event to the user's active flow.
    ///
    /// On error the flow is dropped and the conversation returns to idle;
    /// the caller renders the error per the taxonomy.
    pub async fn handle(
        &self,
        user_id: i64,
        input: FlowInput,
    ) -> Result<EngineReply, TraffikaError> {
        let Some((_, flow)) = self.sessions.remove(&user_id) else {
            return Ok(EngineReply::Rejected(
                "No operation in progress. Use the command menu or /help.".to_string(),
            ));
        };

        match flow.handle(input, self.store.as_ref()).await? {
            FlowProgress::Active(flow, reply) => {
                self.sessions.insert(user_id, flow);
                Ok(EngineReply::Prompt(reply))
            }
            FlowProgress::Finished(message) => {
                debug!(user_id, "flow finished");
                Ok(EngineReply::Finished(message))
            }
            FlowProgress::Handoff(outcome) => {
                debug!(user_id, "flow handed off a request");
                Ok(EngineReply::Handoff(outcome))
            }
        }
    }

    /// Cancel the user's active flow, if any. Accepted from any state;
    /// clears the draft without touching the store.
    pub fn cancel(&self, user_id: i64) -> EngineReply {
        if self.sessions.remove(&user_id).is_some() {
            debug!(user_id, "flow cancelled");
            EngineReply::Finished("Operation cancelled.".to_string())
        } else {
            EngineReply::Rejected("Nothing to cancel.".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use traffika_config::model::StorageConfig;
    use traffika_core::AnalysisKind;
    use traffika_storage::SqliteStore;

    use crate::reply::FlowOutcome;

    const ADMIN: i64 = 1;
    const PARTNER: i64 = 2;

    async fn engine() -> (WorkflowEngine, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("engine.db");
        let store = SqliteStore::new(StorageConfig {
            database_path: db_path.to_str().unwrap().to_string(),
        });
        store.initialize().await.unwrap();
        store.seed_admin(ADMIN, "root").await.unwrap();
        store
            .create_user(PARTNER, "partner_kate", Role::Partner)
            .await
            .unwrap();
        let store: Arc<dyn EntityStore> = Arc::new(store);
        (WorkflowEngine::new(store), dir)
    }

    fn text(s: &str) -> FlowInput {
        FlowInput::Text(s.to_string())
    }

    fn choice(s: &str) -> FlowInput {
        FlowInput::Choice(s.to_string())
    }

    /// Valid inputs for every offer-creation state, in the fixed order.
    const OFFER_INPUTS: [&str; 11] = [
        "Dragon Saga",
        "Match-3 game, CPA",
        "2.5",
        "US, CA",
        "Games",
        "retention day 7 over 5%",
        "appsflyer",
        "protect360",
        "com.example.dragons",
        "tutorial_complete",
        "500",
    ];

    async fn run_offer_creation(engine: &WorkflowEngine) {
        let reply = engine.start(ADMIN, FlowKind::CreateOffer).await.unwrap();
        assert!(matches!(reply, EngineReply::Prompt(_)));

        for (i, input) in OFFER_INPUTS.iter().enumerate() {
            let reply = engine.handle(ADMIN, text(input)).await.unwrap();
            if i + 1 < OFFER_INPUTS.len() {
                assert!(matches!(reply, EngineReply::Prompt(_)), "step {i}");
            } else {
                match reply {
                    EngineReply::Finished(msg) => assert!(msg.contains("Dragon Saga")),
                    other => panic!("expected Finished, got {other:?}"),
                }
            }
        }
    }

    #[tokio::test]
    async fn completing_offer_creation_persists_one_row_in_order() {
        let (engine, _dir) = engine().await;
        run_offer_creation(&engine).await;

        let offers = engine.store.list_offers().await.unwrap();
        assert_eq!(offers.len(), 1);
        let offer = &offers[0];
        assert_eq!(offer.name, "Dragon Saga");
        assert_eq!(offer.description, "Match-3 game, CPA");
        assert_eq!(offer.payout, 2.5);
        assert_eq!(offer.geo, "US, CA");
        assert_eq!(offer.vertical, "Games");
        assert_eq!(offer.kpi, "retention day 7 over 5%");
        assert_eq!(offer.tracker, "appsflyer");
        assert_eq!(offer.antifraud, "protect360");
        assert_eq!(offer.attribution_app_id.as_deref(), Some("com.example.dragons"));
        assert_eq!(offer.attribution_event.as_deref(), Some("tutorial_complete"));
        assert_eq!(offer.daily_limit, Some(500));

        // Flow is over; the next message has nothing to route to.
        assert!(!engine.has_active(ADMIN));
    }

    #[tokio::test]
    async fn validation_failure_reprompts_without_advancing() {
        let (engine, _dir) = engine().await;
        engine.start(ADMIN, FlowKind::CreateOffer).await.unwrap();
        engine.handle(ADMIN, text("Offer")).await.unwrap(); // name
        engine.handle(ADMIN, text("desc")).await.unwrap(); // description

        // Payout state: garbage input is discarded, same state re-prompts.
        let reply = engine.handle(ADMIN, text("a lot")).await.unwrap();
        match reply {
            EngineReply::Prompt(prompt) => assert!(prompt.text.contains("payout amount")),
            other => panic!("expected Prompt, got {other:?}"),
        }

        // A valid decimal now advances to GEO.
        let reply = engine.handle(ADMIN, text("3.0")).await.unwrap();
        match reply {
            EngineReply::Prompt(prompt) => assert!(prompt.text.contains("GEO")),
            other => panic!("expected Prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn negative_payout_is_accepted() {
        let (engine, _dir) = engine().await;
        engine.start(ADMIN, FlowKind::CreateOffer).await.unwrap();
        engine.handle(ADMIN, text("Clawback")).await.unwrap();
        engine.handle(ADMIN, text("desc")).await.unwrap();
        let reply = engine.handle(ADMIN, text("-1.5")).await.unwrap();
        match reply {
            EngineReply::Prompt(prompt) => assert!(prompt.text.contains("GEO")),
            other => panic!("expected Prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn daily_limit_rejects_zero_negative_and_garbage() {
        let (engine, _dir) = engine().await;
        engine.start(ADMIN, FlowKind::CreateOffer).await.unwrap();
        for input in &OFFER_INPUTS[..10] {
            engine.handle(ADMIN, text(input)).await.unwrap();
        }
        for bad in ["0", "-5", "many"] {
            let reply = engine.handle(ADMIN, text(bad)).await.unwrap();
            assert!(
                matches!(reply, EngineReply::Prompt(_)),
                "daily limit {bad:?} must re-prompt"
            );
            assert!(engine.has_active(ADMIN));
        }
        let reply = engine.handle(ADMIN, text("250")).await.unwrap();
        assert!(matches!(reply, EngineReply::Finished(_)));
    }

    #[tokio::test]
    async fn cancel_at_any_state_clears_draft_without_store_mutation() {
        let (engine, _dir) = engine().await;
        engine.start(ADMIN, FlowKind::CreateOffer).await.unwrap();
        engine.handle(ADMIN, text("Half-typed")).await.unwrap();
        engine.handle(ADMIN, text("desc")).await.unwrap();

        let reply = engine.cancel(ADMIN);
        assert!(matches!(reply, EngineReply::Finished(_)));
        assert!(!engine.has_active(ADMIN));
        assert!(engine.store.list_offers().await.unwrap().is_empty());

        // Cancelling again has nothing to clear.
        assert!(matches!(engine.cancel(ADMIN), EngineReply::Rejected(_)));
    }

    #[tokio::test]
    async fn partner_cannot_start_privileged_flows() {
        let (engine, _dir) = engine().await;
        for kind in [FlowKind::CreateOffer, FlowKind::CreateSource, FlowKind::Report] {
            let reply = engine.start(PARTNER, kind).await.unwrap();
            assert!(matches!(reply, EngineReply::Rejected(_)), "{kind:?}");
            assert!(!engine.has_active(PARTNER));
        }
        // Analysis is not privileged.
        let reply = engine.start(PARTNER, FlowKind::Analysis).await.unwrap();
        assert!(matches!(reply, EngineReply::Prompt(_)));
    }

    #[tokio::test]
    async fn second_start_is_rejected_and_first_flow_survives() {
        let (engine, _dir) = engine().await;
        engine.start(ADMIN, FlowKind::CreateOffer).await.unwrap();
        engine.handle(ADMIN, text("Original")).await.unwrap();

        let reply = engine.start(ADMIN, FlowKind::CreateSource).await.unwrap();
        assert!(matches!(reply, EngineReply::Rejected(_)));

        // The first flow is still at the description state.
        let reply = engine.handle(ADMIN, text("still the offer flow")).await.unwrap();
        match reply {
            EngineReply::Prompt(prompt) => assert!(prompt.text.contains("payout amount")),
            other => panic!("expected Prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn input_without_active_flow_is_rejected() {
        let (engine, _dir) = engine().await;
        let reply = engine.handle(ADMIN, text("hello?")).await.unwrap();
        assert!(matches!(reply, EngineReply::Rejected(_)));
    }

    #[tokio::test]
    async fn edit_flow_persists_each_field_immediately_and_loops_to_menu() {
        let (engine, _dir) = engine().await;
        run_offer_creation(&engine).await;
        let offer_id = engine.store.list_offers().await.unwrap()[0].id;

        let reply = engine
            .start(ADMIN, FlowKind::EditOffer { offer_id })
            .await
            .unwrap();
        match reply {
            EngineReply::Prompt(menu) => {
                assert!(menu.options.iter().any(|(_, data)| data == "payout"));
                assert!(menu.options.iter().any(|(_, data)| data == "back"));
            }
            other => panic!("expected menu Prompt, got {other:?}"),
        }

        // Pick payout, submit a new value: persisted before the menu returns.
        engine.handle(ADMIN, choice("payout")).await.unwrap();
        let reply = engine.handle(ADMIN, text("9.99")).await.unwrap();
        match reply {
            EngineReply::Prompt(menu) => {
                assert!(menu.text.contains("Payout updated."));
                assert!(menu.text.contains("9.99"));
            }
            other => panic!("expected menu Prompt, got {other:?}"),
        }
        let offer = engine.store.get_offer(offer_id).await.unwrap().unwrap();
        assert_eq!(offer.payout, 9.99);

        // Still in the loop: edit another field.
        engine.handle(ADMIN, choice("geo")).await.unwrap();
        engine.handle(ADMIN, text("BR")).await.unwrap();
        let offer = engine.store.get_offer(offer_id).await.unwrap().unwrap();
        assert_eq!(offer.geo, "BR");

        // Only "back" leaves the loop.
        let reply = engine.handle(ADMIN, choice("back")).await.unwrap();
        assert!(matches!(reply, EngineReply::Finished(_)));
        assert!(!engine.has_active(ADMIN));
    }

    #[tokio::test]
    async fn edit_of_unknown_offer_fails_with_not_found() {
        let (engine, _dir) = engine().await;
        let err = engine
            .start(ADMIN, FlowKind::EditOffer { offer_id: 404 })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TraffikaError::NotFound { entity: "offer", .. }
        ));
        assert!(!engine.has_active(ADMIN));
    }

    #[tokio::test]
    async fn analysis_flow_collects_request_and_hands_off() {
        let (engine, _dir) = engine().await;
        run_offer_creation(&engine).await;
        let offer_id = engine.store.list_offers().await.unwrap()[0].id;

        engine.start(ADMIN, FlowKind::Analysis).await.unwrap();
        engine.handle(ADMIN, choice("forecast")).await.unwrap();
        engine
            .handle(ADMIN, choice(&offer_id.to_string()))
            .await
            .unwrap();
        engine
            .handle(ADMIN, text("2024-01-01 2024-01-31"))
            .await
            .unwrap();
        let reply = engine.handle(ADMIN, choice("all")).await.unwrap();

        match reply {
            EngineReply::Handoff(FlowOutcome::Analysis(request)) => {
                assert_eq!(request.kind, AnalysisKind::Forecast);
                assert_eq!(request.offer_id, offer_id);
                assert_eq!(request.range.days(), 31);
                assert!(request.media_source.is_none());
            }
            other => panic!("expected analysis handoff, got {other:?}"),
        }
        assert!(!engine.has_active(ADMIN));
    }

    #[tokio::test]
    async fn analysis_flow_named_source_confirm_loop() {
        let (engine, _dir) = engine().await;
        run_offer_creation(&engine).await;
        let offer_id = engine.store.list_offers().await.unwrap()[0].id;

        engine.start(ADMIN, FlowKind::Analysis).await.unwrap();
        engine.handle(ADMIN, choice("conversion")).await.unwrap();
        engine
            .handle(ADMIN, choice(&offer_id.to_string()))
            .await
            .unwrap();
        engine
            .handle(ADMIN, text("2024-02-01 2024-02-10"))
            .await
            .unwrap();
        engine.handle(ADMIN, choice("specific")).await.unwrap();
        engine.handle(ADMIN, text("facebook")).await.unwrap();

        // Change loops back to source entry.
        engine.handle(ADMIN, choice("change")).await.unwrap();
        engine.handle(ADMIN, text("google_ads")).await.unwrap();
        let reply = engine.handle(ADMIN, choice("confirm")).await.unwrap();

        match reply {
            EngineReply::Handoff(FlowOutcome::Analysis(request)) => {
                assert_eq!(request.media_source.as_deref(), Some("google_ads"));
            }
            other => panic!("expected analysis handoff, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn analysis_date_validation_reprompts() {
        let (engine, _dir) = engine().await;
        run_offer_creation(&engine).await;
        let offer_id = engine.store.list_offers().await.unwrap()[0].id;

        engine.start(ADMIN, FlowKind::Analysis).await.unwrap();
        engine.handle(ADMIN, choice("trend")).await.unwrap();
        engine
            .handle(ADMIN, choice(&offer_id.to_string()))
            .await
            .unwrap();

        for bad in ["2024-01-01", "2024-01-31 2024-01-01", "soon later"] {
            let reply = engine.handle(ADMIN, text(bad)).await.unwrap();
            assert!(matches!(reply, EngineReply::Prompt(_)), "{bad:?}");
        }
        let reply = engine
            .handle(ADMIN, text("2024-01-01 2024-01-03"))
            .await
            .unwrap();
        match reply {
            EngineReply::Prompt(prompt) => assert!(prompt.text.contains("traffic source")),
            other => panic!("expected Prompt, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn report_flow_for_events_collects_custom_event_and_fields() {
        let (engine, _dir) = engine().await;
        run_offer_creation(&engine).await;
        let offer_id = engine.store.list_offers().await.unwrap()[0].id;

        engine.start(ADMIN, FlowKind::Report).await.unwrap();
        engine.handle(ADMIN, choice("events")).await.unwrap();
        engine.handle(ADMIN, choice("custom_event")).await.unwrap();
        engine.handle(ADMIN, text("purchase")).await.unwrap();
        engine.handle(ADMIN, choice("custom_fields")).await.unwrap();
        engine
            .handle(ADMIN, text("device_model, campaign_type"))
            .await
            .unwrap();
        engine
            .handle(ADMIN, text("2024-03-01 2024-03-07"))
            .await
            .unwrap();
        let reply = engine
            .handle(ADMIN, choice(&offer_id.to_string()))
            .await
            .unwrap();

        match reply {
            EngineReply::Handoff(FlowOutcome::Report(request)) => {
                assert_eq!(request.kind, traffika_core::ReportKind::Events);
                assert_eq!(request.event_name.as_deref(), Some("purchase"));
                assert_eq!(
                    request.extra_fields,
                    traffika_core::ExtraFields::Custom("device_model, campaign_type".into())
                );
                assert_eq!(request.offer_id, offer_id);
            }
            other => panic!("expected report handoff, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn report_flow_installs_skips_event_states() {
        let (engine, _dir) = engine().await;
        run_offer_creation(&engine).await;
        let offer_id = engine.store.list_offers().await.unwrap()[0].id;

        engine.start(ADMIN, FlowKind::Report).await.unwrap();
        let reply = engine.handle(ADMIN, choice("installs")).await.unwrap();
        match reply {
            EngineReply::Prompt(prompt) => assert!(prompt.text.contains("YYYY-MM-DD")),
            other => panic!("expected dates Prompt, got {other:?}"),
        }
        engine
            .handle(ADMIN, text("2024-03-01 2024-03-07"))
            .await
            .unwrap();
        let reply = engine
            .handle(ADMIN, choice(&offer_id.to_string()))
            .await
            .unwrap();
        assert!(matches!(
            reply,
            EngineReply::Handoff(FlowOutcome::Report(_))
        ));
    }
}
