// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analysis request collection: kind, offer, date range, source filter.
//!
//! Completing the flow hands an [`AnalysisRequest`] back to the caller;
//! no fetching or computation happens here.

use std::str::FromStr;

use traffika_core::{AnalysisKind, AnalysisRequest, DateRange, EntityStore, TraffikaError};

use crate::reply::{FlowInput, FlowOutcome, FlowReply};
use crate::validators;

use super::{ActiveFlow, FlowProgress};

const ALL_SOURCES: &str = "all";
const SPECIFIC_SOURCE: &str = "specific";
const CONFIRM_SOURCE: &str = "confirm";
const CHANGE_SOURCE: &str = "change";

#[derive(Debug, Clone, PartialEq, Eq)]
enum AnalysisState {
    PickKind,
    PickOffer,
    EnterDates,
    SourceChoice,
    EnterSource,
    ConfirmSource { pending: String },
}

/// Collects the parameters of one analytics request.
#[derive(Debug)]
pub struct AnalysisFlow {
    state: AnalysisState,
    kind: Option<AnalysisKind>,
    offer_id: Option<i64>,
    range: Option<DateRange>,
}

impl AnalysisFlow {
    /// Begin the flow at the analysis-kind menu.
    pub fn start() -> (Self, FlowReply) {
        let flow = Self {
            state: AnalysisState::PickKind,
            kind: None,
            offer_id: None,
            range: None,
        };
        let reply = Self::kind_menu();
        (flow, reply)
    }

    fn kind_menu() -> FlowReply {
        FlowReply::with_options(
            "Select analysis type:",
            vec![
                ("Conversion".to_string(), AnalysisKind::Conversion.to_string()),
                ("Revenue forecast".to_string(), AnalysisKind::Forecast.to_string()),
                ("Install trends".to_string(), AnalysisKind::Trend.to_string()),
            ],
        )
    }

    fn source_menu() -> FlowReply {
        FlowReply::with_options(
            "Select traffic source:",
            vec![
                ("All sources".to_string(), ALL_SOURCES.to_string()),
                ("Specify source".to_string(), SPECIFIC_SOURCE.to_string()),
            ],
        )
    }

    fn complete(&self, media_source: Option<String>) -> Result<FlowProgress, TraffikaError> {
        // All states before this one fill their field; a gap is a bug.
        let request = AnalysisRequest {
            kind: self
                .kind
                .ok_or_else(|| TraffikaError::Internal("analysis flow lost its kind".into()))?,
            offer_id: self
                .offer_id
                .ok_or_else(|| TraffikaError::Internal("analysis flow lost its offer".into()))?,
            range: self
                .range
                .ok_or_else(|| TraffikaError::Internal("analysis flow lost its range".into()))?,
            media_source,
        };
        Ok(FlowProgress::Handoff(FlowOutcome::Analysis(request)))
    }

    pub(super) async fn handle(
        mut self,
        input: FlowInput,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        match self.state.clone() {
            AnalysisState::PickKind => match input {
                FlowInput::Choice(token) => match AnalysisKind::from_str(&token) {
                    Ok(kind) => {
                        self.kind = Some(kind);
                        let offers = store.list_offers().await?;
                        if offers.is_empty() {
                            return Ok(FlowProgress::Finished(
                                "No offers available for analysis.".to_string(),
                            ));
                        }
                        self.state = AnalysisState::PickOffer;
                        let options = offers
                            .into_iter()
                            .map(|o| (o.name, o.id.to_string()))
                            .collect();
                        let reply =
                            FlowReply::with_options("Select offer for analysis:", options);
                        Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                    }
                    Err(_) => {
                        let reply = Self::kind_menu();
                        Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                    }
                },
                FlowInput::Text(_) => {
                    let reply = Self::kind_menu();
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
            },
            AnalysisState::PickOffer => match input {
                FlowInput::Choice(token) => match token.parse::<i64>() {
                    Ok(offer_id) => {
                        self.offer_id = Some(offer_id);
                        self.state = AnalysisState::EnterDates;
                        let reply = FlowReply::text(
                            "Enter dates as YYYY-MM-DD YYYY-MM-DD, e.g. 2024-01-01 2024-01-31",
                        );
                        Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                    }
                    Err(_) => {
                        let reply = FlowReply::text("Pick an offer from the list.");
                        Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                    }
                },
                FlowInput::Text(_) => {
                    let reply = FlowReply::text("Pick an offer from the list.");
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
            },
            AnalysisState::EnterDates => match input {
                FlowInput::Text(text) => match validators::parse_date_range(&text) {
                    Ok(range) => {
                        self.range = Some(range);
                        self.state = AnalysisState::SourceChoice;
                        Ok(FlowProgress::Active(
                            ActiveFlow::Analysis(self),
                            Self::source_menu(),
                        ))
                    }
                    Err(TraffikaError::Validation(msg)) => {
                        let reply = FlowReply::text(format!("{msg}. Try again:"));
                        Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                    }
                    Err(e) => Err(e),
                },
                FlowInput::Choice(_) => {
                    let reply = FlowReply::text(
                        "Enter dates as YYYY-MM-DD YYYY-MM-DD, e.g. 2024-01-01 2024-01-31",
                    );
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
            },
            AnalysisState::SourceChoice => match input {
                FlowInput::Choice(token) if token == ALL_SOURCES => self.complete(None),
                FlowInput::Choice(token) if token == SPECIFIC_SOURCE => {
                    self.state = AnalysisState::EnterSource;
                    let reply =
                        FlowReply::text("Enter source name (e.g. facebook, google_ads):");
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
                _ => Ok(FlowProgress::Active(
                    ActiveFlow::Analysis(self),
                    Self::source_menu(),
                )),
            },
            AnalysisState::EnterSource => match input {
                FlowInput::Text(text) => {
                    let pending = text.trim().to_string();
                    if pending.is_empty() {
                        let reply = FlowReply::text("Enter a non-empty source name:");
                        return Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply));
                    }
                    let reply = FlowReply::with_options(
                        format!("Traffic source: {pending}. Confirm or change:"),
                        vec![
                            ("Confirm".to_string(), CONFIRM_SOURCE.to_string()),
                            ("Change".to_string(), CHANGE_SOURCE.to_string()),
                        ],
                    );
                    self.state = AnalysisState::ConfirmSource { pending };
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
                FlowInput::Choice(_) => {
                    let reply =
                        FlowReply::text("Enter source name (e.g. facebook, google_ads):");
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
            },
            AnalysisState::ConfirmSource { pending } => match input {
                FlowInput::Choice(token) if token == CONFIRM_SOURCE => {
                    self.complete(Some(pending))
                }
                FlowInput::Choice(token) if token == CHANGE_SOURCE => {
                    self.state = AnalysisState::EnterSource;
                    let reply =
                        FlowReply::text("Enter source name (e.g. facebook, google_ads):");
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
                _ => {
                    let reply = FlowReply::with_options(
                        format!("Traffic source: {pending}. Confirm or change:"),
                        vec![
                            ("Confirm".to_string(), CONFIRM_SOURCE.to_string()),
                            ("Change".to_string(), CHANGE_SOURCE.to_string()),
                        ],
                    );
                    self.state = AnalysisState::ConfirmSource { pending };
                    Ok(FlowProgress::Active(ActiveFlow::Analysis(self), reply))
                }
            },
        }
    }
}
