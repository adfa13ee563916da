// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Straight-line creation flows: one prompt per field in a fixed order,
//! committing exactly one row at the end.

use tracing::info;
use traffika_core::{EntityStore, OfferField, SourceField, TraffikaError};

use crate::draft::{OfferDraft, SourceDraft};
use crate::reply::{FlowInput, FlowReply};

use super::{
    offer_prompt, source_prompt, validate_offer_field, validate_source_field, ActiveFlow,
    FlowProgress,
};

/// Collects all offer fields in [`OfferField::CREATE_ORDER`], then inserts
/// one offer row.
#[derive(Debug)]
pub struct OfferCreateFlow {
    idx: usize,
    draft: OfferDraft,
}

impl OfferCreateFlow {
    /// Begin the flow with the first field prompt.
    pub fn start() -> (Self, FlowReply) {
        let flow = Self {
            idx: 0,
            draft: OfferDraft::default(),
        };
        let reply = FlowReply::text(format!(
            "Adding a new offer. {}",
            offer_prompt(OfferField::CREATE_ORDER[0])
        ));
        (flow, reply)
    }

    pub(super) async fn handle(
        mut self,
        input: FlowInput,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        let field = OfferField::CREATE_ORDER[self.idx];

        let raw = match input {
            FlowInput::Text(text) => text,
            FlowInput::Choice(_) => {
                // Buttons have no meaning here; ask again.
                let reply = FlowReply::text(offer_prompt(field));
                return Ok(FlowProgress::Active(ActiveFlow::CreateOffer(self), reply));
            }
        };

        let value = match validate_offer_field(field, &raw) {
            Ok(value) => value,
            Err(TraffikaError::Validation(msg)) => {
                let reply = FlowReply::text(format!("{msg}. {}", offer_prompt(field)));
                return Ok(FlowProgress::Active(ActiveFlow::CreateOffer(self), reply));
            }
            Err(e) => return Err(e),
        };

        self.draft.apply(field, value)?;
        self.idx += 1;

        if self.idx < OfferField::CREATE_ORDER.len() {
            let reply = FlowReply::text(offer_prompt(OfferField::CREATE_ORDER[self.idx]));
            return Ok(FlowProgress::Active(ActiveFlow::CreateOffer(self), reply));
        }

        // Commit: the only transition of this flow that touches the store.
        let offer = self.draft.complete()?;
        let name = offer.name.clone();
        let id = store.create_offer(&offer).await?;
        info!(id, name = %name, "offer created");
        Ok(FlowProgress::Finished(format!(
            "Offer \"{name}\" added with id {id}."
        )))
    }
}

/// Collects all source fields in [`SourceField::CREATE_ORDER`], then
/// inserts one traffic source row.
#[derive(Debug)]
pub struct SourceCreateFlow {
    idx: usize,
    draft: SourceDraft,
}

impl SourceCreateFlow {
    /// Begin the flow with the first field prompt.
    pub fn start() -> (Self, FlowReply) {
        let flow = Self {
            idx: 0,
            draft: SourceDraft::default(),
        };
        let reply = FlowReply::text(format!(
            "Adding a new traffic source. {}",
            source_prompt(SourceField::CREATE_ORDER[0])
        ));
        (flow, reply)
    }

    pub(super) async fn handle(
        mut self,
        input: FlowInput,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        let field = SourceField::CREATE_ORDER[self.idx];

        let raw = match input {
            FlowInput::Text(text) => text,
            FlowInput::Choice(_) => {
                let reply = FlowReply::text(source_prompt(field));
                return Ok(FlowProgress::Active(ActiveFlow::CreateSource(self), reply));
            }
        };

        let value = match validate_source_field(field, &raw) {
            Ok(value) => value,
            Err(TraffikaError::Validation(msg)) => {
                let reply = FlowReply::text(format!("{msg}. {}", source_prompt(field)));
                return Ok(FlowProgress::Active(ActiveFlow::CreateSource(self), reply));
            }
            Err(e) => return Err(e),
        };

        self.draft.apply(field, value)?;
        self.idx += 1;

        if self.idx < SourceField::CREATE_ORDER.len() {
            let reply = FlowReply::text(source_prompt(SourceField::CREATE_ORDER[self.idx]));
            return Ok(FlowProgress::Active(ActiveFlow::CreateSource(self), reply));
        }

        let source = self.draft.complete()?;
        let name = source.name.clone();
        let id = store.create_source(&source).await?;
        info!(id, name = %name, "traffic source created");
        Ok(FlowProgress::Finished(format!(
            "Traffic source \"{name}\" added with id {id}."
        )))
    }
}
