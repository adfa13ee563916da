// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report request collection: report kind, event details for in-app-event
//! reports, date range, and the target offer.

use std::str::FromStr;

use traffika_core::{
    DateRange, EntityStore, ExtraFields, ReportKind, ReportRequest, TraffikaError,
};

use crate::reply::{FlowInput, FlowOutcome, FlowReply};
use crate::validators;

use super::{ActiveFlow, FlowProgress};

const OFFER_EVENT: &str = "offer_event";
const CUSTOM_EVENT: &str = "custom_event";
const ALL_FIELDS: &str = "all_fields";
const NO_FIELDS: &str = "no_fields";
const CUSTOM_FIELDS: &str = "custom_fields";

const DATES_PROMPT: &str = "Enter dates as YYYY-MM-DD YYYY-MM-DD, e.g. 2024-01-01 2024-01-31";

#[derive(Debug, Clone, PartialEq, Eq)]
enum ReportState {
    PickKind,
    EventSource,
    EnterEventName,
    FieldsChoice,
    EnterCustomFields,
    EnterDates,
    PickOffer,
}

/// Collects the parameters of one report request.
#[derive(Debug)]
pub struct ReportFlow {
    state: ReportState,
    kind: Option<ReportKind>,
    event_name: Option<String>,
    extra_fields: ExtraFields,
    range: Option<DateRange>,
}

impl ReportFlow {
    /// Begin the flow at the report-kind menu.
    pub fn start() -> (Self, FlowReply) {
        let flow = Self {
            state: ReportState::PickKind,
            kind: None,
            event_name: None,
            extra_fields: ExtraFields::Default,
            range: None,
        };
        let reply = Self::kind_menu();
        (flow, reply)
    }

    fn kind_menu() -> FlowReply {
        FlowReply::with_options(
            "Select report type:",
            vec![
                ("Installs".to_string(), ReportKind::Installs.to_string()),
                ("In-app events".to_string(), ReportKind::Events.to_string()),
                (
                    "Post-attribution".to_string(),
                    ReportKind::PostAttribution.to_string(),
                ),
                ("Summary".to_string(), ReportKind::Summary.to_string()),
            ],
        )
    }

    fn event_source_menu() -> FlowReply {
        FlowReply::with_options(
            "Select event source:",
            vec![
                ("Use offer event".to_string(), OFFER_EVENT.to_string()),
                ("Enter manually".to_string(), CUSTOM_EVENT.to_string()),
            ],
        )
    }

    fn fields_menu() -> FlowReply {
        FlowReply::with_options(
            "Choose additional report columns:",
            vec![
                ("All fields".to_string(), ALL_FIELDS.to_string()),
                ("No additional fields".to_string(), NO_FIELDS.to_string()),
                ("Specify fields".to_string(), CUSTOM_FIELDS.to_string()),
            ],
        )
    }

    async fn offer_menu(
        mut self,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        let offers = store.list_offers().await?;
        if offers.is_empty() {
            return Ok(FlowProgress::Finished("No offers available.".to_string()));
        }
        self.state = ReportState::PickOffer;
        let options = offers
            .into_iter()
            .map(|o| (o.name, o.id.to_string()))
            .collect();
        let reply = FlowReply::with_options("Select offer:", options);
        Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
    }

    pub(super) async fn handle(
        mut self,
        input: FlowInput,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        match self.state.clone() {
            ReportState::PickKind => match input {
                FlowInput::Choice(token) => match ReportKind::from_str(&token) {
                    Ok(kind) => {
                        self.kind = Some(kind);
                        if kind == ReportKind::Events {
                            self.state = ReportState::EventSource;
                            Ok(FlowProgress::Active(
                                ActiveFlow::Report(self),
                                Self::event_source_menu(),
                            ))
                        } else {
                            self.state = ReportState::EnterDates;
                            Ok(FlowProgress::Active(
                                ActiveFlow::Report(self),
                                FlowReply::text(DATES_PROMPT),
                            ))
                        }
                    }
                    Err(_) => Ok(FlowProgress::Active(
                        ActiveFlow::Report(self),
                        Self::kind_menu(),
                    )),
                },
                FlowInput::Text(_) => Ok(FlowProgress::Active(
                    ActiveFlow::Report(self),
                    Self::kind_menu(),
                )),
            },
            ReportState::EventSource => match input {
                FlowInput::Choice(token) if token == CUSTOM_EVENT => {
                    self.state = ReportState::EnterEventName;
                    let reply =
                        FlowReply::text("Enter event name (e.g. purchase, level_complete):");
                    Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
                }
                FlowInput::Choice(token) if token == OFFER_EVENT => {
                    // The offer's own event is resolved at execution time.
                    self.state = ReportState::EnterDates;
                    Ok(FlowProgress::Active(
                        ActiveFlow::Report(self),
                        FlowReply::text(DATES_PROMPT),
                    ))
                }
                _ => Ok(FlowProgress::Active(
                    ActiveFlow::Report(self),
                    Self::event_source_menu(),
                )),
            },
            ReportState::EnterEventName => match input {
                FlowInput::Text(text) => {
                    let name = text.trim().to_string();
                    if name.is_empty() {
                        let reply = FlowReply::text("Enter a non-empty event name:");
                        return Ok(FlowProgress::Active(ActiveFlow::Report(self), reply));
                    }
                    self.event_name = Some(name);
                    self.state = ReportState::FieldsChoice;
                    Ok(FlowProgress::Active(
                        ActiveFlow::Report(self),
                        Self::fields_menu(),
                    ))
                }
                FlowInput::Choice(_) => {
                    let reply =
                        FlowReply::text("Enter event name (e.g. purchase, level_complete):");
                    Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
                }
            },
            ReportState::FieldsChoice => match input {
                FlowInput::Choice(token) if token == ALL_FIELDS => {
                    self.extra_fields = ExtraFields::All;
                    self.state = ReportState::EnterDates;
                    Ok(FlowProgress::Active(
                        ActiveFlow::Report(self),
                        FlowReply::text(DATES_PROMPT),
                    ))
                }
                FlowInput::Choice(token) if token == NO_FIELDS => {
                    self.extra_fields = ExtraFields::Default;
                    self.state = ReportState::EnterDates;
                    Ok(FlowProgress::Active(
                        ActiveFlow::Report(self),
                        FlowReply::text(DATES_PROMPT),
                    ))
                }
                FlowInput::Choice(token) if token == CUSTOM_FIELDS => {
                    self.state = ReportState::EnterCustomFields;
                    let reply = FlowReply::text("Enter additional fields (comma-separated):");
                    Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
                }
                _ => Ok(FlowProgress::Active(
                    ActiveFlow::Report(self),
                    Self::fields_menu(),
                )),
            },
            ReportState::EnterCustomFields => match input {
                FlowInput::Text(text) => {
                    self.extra_fields = ExtraFields::Custom(text.trim().to_string());
                    self.state = ReportState::EnterDates;
                    Ok(FlowProgress::Active(
                        ActiveFlow::Report(self),
                        FlowReply::text(DATES_PROMPT),
                    ))
                }
                FlowInput::Choice(_) => {
                    let reply = FlowReply::text("Enter additional fields (comma-separated):");
                    Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
                }
            },
            ReportState::EnterDates => match input {
                FlowInput::Text(text) => match validators::parse_date_range(&text) {
                    Ok(range) => {
                        self.range = Some(range);
                        self.offer_menu(store).await
                    }
                    Err(TraffikaError::Validation(msg)) => {
                        let reply = FlowReply::text(format!("{msg}. Try again:"));
                        Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
                    }
                    Err(e) => Err(e),
                },
                FlowInput::Choice(_) => Ok(FlowProgress::Active(
                    ActiveFlow::Report(self),
                    FlowReply::text(DATES_PROMPT),
                )),
            },
            ReportState::PickOffer => match input {
                FlowInput::Choice(token) => match token.parse::<i64>() {
                    Ok(offer_id) => {
                        let request = ReportRequest {
                            kind: self.kind.ok_or_else(|| {
                                TraffikaError::Internal("report flow lost its kind".into())
                            })?,
                            offer_id,
                            range: self.range.ok_or_else(|| {
                                TraffikaError::Internal("report flow lost its range".into())
                            })?,
                            event_name: self.event_name,
                            extra_fields: self.extra_fields,
                        };
                        Ok(FlowProgress::Handoff(FlowOutcome::Report(request)))
                    }
                    Err(_) => {
                        let reply = FlowReply::text("Pick an offer from the list.");
                        Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
                    }
                },
                FlowInput::Text(_) => {
                    let reply = FlowReply::text("Pick an offer from the list.");
                    Ok(FlowProgress::Active(ActiveFlow::Report(self), reply))
                }
            },
        }
    }
}
