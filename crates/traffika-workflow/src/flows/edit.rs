// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Edit flows: a menu of editable fields, a single-field sub-state that
//! persists immediately, and a loop back to the menu.
//!
//! This is the one branching state machine in the system; everything
//! else is a straight line.

use std::str::FromStr;

use tracing::info;
use traffika_core::{
    EntityStore, Offer, OfferField, SourceField, TraffikaError, TrafficSource,
};

use crate::reply::{FlowInput, FlowReply};

use super::{
    offer_prompt, source_prompt, validate_offer_field, validate_source_field, ActiveFlow,
    FlowProgress,
};

const BACK: &str = "back";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditState<F> {
    Menu,
    AwaitValue(F),
}

/// Menu-loop editor over one offer. Holds a snapshot of the row that is
/// refreshed after every persisted change.
#[derive(Debug)]
pub struct OfferEditFlow {
    offer: Offer,
    state: EditState<OfferField>,
}

impl OfferEditFlow {
    /// Begin the flow at the field menu.
    pub fn start(offer: Offer) -> (Self, FlowReply) {
        let flow = Self {
            offer,
            state: EditState::Menu,
        };
        let reply = flow.menu_reply();
        (flow, reply)
    }

    fn menu_reply(&self) -> FlowReply {
        let mut lines = vec![format!(
            "Editing offer \"{}\" (id {}). Pick a field to change:",
            self.offer.name, self.offer.id
        )];
        for field in OfferField::CREATE_ORDER {
            lines.push(format!("{}: {}", field.label(), offer_value(&self.offer, field)));
        }

        let mut options: Vec<(String, String)> = OfferField::CREATE_ORDER
            .iter()
            .map(|f| (f.label().to_string(), f.to_string()))
            .collect();
        options.push(("Back".to_string(), BACK.to_string()));

        FlowReply::with_options(lines.join("\n"), options)
    }

    pub(super) async fn handle(
        mut self,
        input: FlowInput,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        match self.state {
            EditState::Menu => match input {
                FlowInput::Choice(token) if token == BACK => Ok(FlowProgress::Finished(
                    format!("Finished editing \"{}\".", self.offer.name),
                )),
                FlowInput::Choice(token) => match OfferField::from_str(&token) {
                    Ok(field) => {
                        self.state = EditState::AwaitValue(field);
                        let reply = FlowReply::text(format!(
                            "{} Current value: {}",
                            offer_prompt(field),
                            offer_value(&self.offer, field)
                        ));
                        Ok(FlowProgress::Active(ActiveFlow::EditOffer(self), reply))
                    }
                    Err(_) => {
                        let reply = self.menu_reply();
                        Ok(FlowProgress::Active(ActiveFlow::EditOffer(self), reply))
                    }
                },
                FlowInput::Text(_) => {
                    let reply = self.menu_reply();
                    Ok(FlowProgress::Active(ActiveFlow::EditOffer(self), reply))
                }
            },
            EditState::AwaitValue(field) => {
                let raw = match input {
                    FlowInput::Text(text) => text,
                    FlowInput::Choice(_) => {
                        let reply = FlowReply::text(offer_prompt(field));
                        return Ok(FlowProgress::Active(ActiveFlow::EditOffer(self), reply));
                    }
                };

                let value = match validate_offer_field(field, &raw) {
                    Ok(value) => value,
                    Err(TraffikaError::Validation(msg)) => {
                        let reply = FlowReply::text(format!("{msg}. {}", offer_prompt(field)));
                        return Ok(FlowProgress::Active(ActiveFlow::EditOffer(self), reply));
                    }
                    Err(e) => return Err(e),
                };

                // Persist this one field immediately, then refresh the snapshot.
                let id = self.offer.id;
                let affected = store.update_offer_field(id, field, value).await?;
                if affected == 0 {
                    return Err(TraffikaError::NotFound {
                        entity: "offer",
                        id,
                    });
                }
                self.offer = store.get_offer(id).await?.ok_or(TraffikaError::NotFound {
                    entity: "offer",
                    id,
                })?;
                info!(id, field = %field, "offer field updated");

                self.state = EditState::Menu;
                let mut reply = self.menu_reply();
                reply.text = format!("{} updated.\n{}", field.label(), reply.text);
                Ok(FlowProgress::Active(ActiveFlow::EditOffer(self), reply))
            }
        }
    }
}

fn offer_value(offer: &Offer, field: OfferField) -> String {
    match field {
        OfferField::Name => offer.name.clone(),
        OfferField::Description => offer.description.clone(),
        OfferField::Payout => offer.payout.to_string(),
        OfferField::Geo => offer.geo.clone(),
        OfferField::Vertical => offer.vertical.clone(),
        OfferField::Kpi => offer.kpi.clone(),
        OfferField::Tracker => offer.tracker.clone(),
        OfferField::Antifraud => offer.antifraud.clone(),
        OfferField::AppId => offer.attribution_app_id.clone().unwrap_or_default(),
        OfferField::EventName => offer.attribution_event.clone().unwrap_or_default(),
        OfferField::DailyLimit => offer
            .daily_limit
            .map(|l| l.to_string())
            .unwrap_or_default(),
    }
}

/// Menu-loop editor over one traffic source.
#[derive(Debug)]
pub struct SourceEditFlow {
    source: TrafficSource,
    state: EditState<SourceField>,
}

impl SourceEditFlow {
    /// Begin the flow at the field menu.
    pub fn start(source: TrafficSource) -> (Self, FlowReply) {
        let flow = Self {
            source,
            state: EditState::Menu,
        };
        let reply = flow.menu_reply();
        (flow, reply)
    }

    fn menu_reply(&self) -> FlowReply {
        let mut lines = vec![format!(
            "Editing source \"{}\" (id {}). Pick a field to change:",
            self.source.name, self.source.id
        )];
        for field in SourceField::CREATE_ORDER {
            lines.push(format!(
                "{}: {}",
                field.label(),
                source_value(&self.source, field)
            ));
        }

        let mut options: Vec<(String, String)> = SourceField::CREATE_ORDER
            .iter()
            .map(|f| (f.label().to_string(), f.to_string()))
            .collect();
        options.push(("Back".to_string(), BACK.to_string()));

        FlowReply::with_options(lines.join("\n"), options)
    }

    pub(super) async fn handle(
        mut self,
        input: FlowInput,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        match self.state {
            EditState::Menu => match input {
                FlowInput::Choice(token) if token == BACK => Ok(FlowProgress::Finished(
                    format!("Finished editing \"{}\".", self.source.name),
                )),
                FlowInput::Choice(token) => match SourceField::from_str(&token) {
                    Ok(field) => {
                        self.state = EditState::AwaitValue(field);
                        let reply = FlowReply::text(format!(
                            "{} Current value: {}",
                            source_prompt(field),
                            source_value(&self.source, field)
                        ));
                        Ok(FlowProgress::Active(ActiveFlow::EditSource(self), reply))
                    }
                    Err(_) => {
                        let reply = self.menu_reply();
                        Ok(FlowProgress::Active(ActiveFlow::EditSource(self), reply))
                    }
                },
                FlowInput::Text(_) => {
                    let reply = self.menu_reply();
                    Ok(FlowProgress::Active(ActiveFlow::EditSource(self), reply))
                }
            },
            EditState::AwaitValue(field) => {
                let raw = match input {
                    FlowInput::Text(text) => text,
                    FlowInput::Choice(_) => {
                        let reply = FlowReply::text(source_prompt(field));
                        return Ok(FlowProgress::Active(ActiveFlow::EditSource(self), reply));
                    }
                };

                let value = match validate_source_field(field, &raw) {
                    Ok(value) => value,
                    Err(TraffikaError::Validation(msg)) => {
                        let reply =
                            FlowReply::text(format!("{msg}. {}", source_prompt(field)));
                        return Ok(FlowProgress::Active(ActiveFlow::EditSource(self), reply));
                    }
                    Err(e) => return Err(e),
                };

                let id = self.source.id;
                let affected = store.update_source_field(id, field, value).await?;
                if affected == 0 {
                    return Err(TraffikaError::NotFound {
                        entity: "source",
                        id,
                    });
                }
                self.source = store.get_source(id).await?.ok_or(TraffikaError::NotFound {
                    entity: "source",
                    id,
                })?;
                info!(id, field = %field, "source field updated");

                self.state = EditState::Menu;
                let mut reply = self.menu_reply();
                reply.text = format!("{} updated.\n{}", field.label(), reply.text);
                Ok(FlowProgress::Active(ActiveFlow::EditSource(self), reply))
            }
        }
    }
}

fn source_value(source: &TrafficSource, field: SourceField) -> String {
    match field {
        SourceField::Name => source.name.clone(),
        SourceField::Conversion => source.conversion.to_string(),
        SourceField::Cost => source.cost.to_string(),
        SourceField::Capacity => source.capacity.to_string(),
        SourceField::Geo => source.geo.clone(),
        SourceField::Performance => source.performance.clone(),
    }
}
