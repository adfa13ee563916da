// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flow implementations, one module per conversation shape.
//!
//! Every flow consumes itself on each event and either returns itself
//! (wrapped back into [`ActiveFlow`]) with the next prompt, or ends.

pub mod analysis;
pub mod create;
pub mod edit;
pub mod report;

use traffika_core::{EntityStore, FieldValue, OfferField, SourceField, TraffikaError};

use crate::reply::{FlowInput, FlowOutcome, FlowReply};
use crate::validators;

/// The one flow a user may have active at a time.
#[derive(Debug)]
pub enum ActiveFlow {
    CreateOffer(create::OfferCreateFlow),
    CreateSource(create::SourceCreateFlow),
    EditOffer(edit::OfferEditFlow),
    EditSource(edit::SourceEditFlow),
    Analysis(analysis::AnalysisFlow),
    Report(report::ReportFlow),
}

/// Result of feeding one input into a flow.
#[derive(Debug)]
pub enum FlowProgress {
    /// Flow continues with the next prompt.
    Active(ActiveFlow, FlowReply),
    /// Flow ended with a user-facing confirmation.
    Finished(String),
    /// Flow ended by producing a request for the caller to execute.
    Handoff(FlowOutcome),
}

impl ActiveFlow {
    /// Advance the flow by one input event.
    pub async fn handle(
        self,
        input: FlowInput,
        store: &dyn EntityStore,
    ) -> Result<FlowProgress, TraffikaError> {
        match self {
            ActiveFlow::CreateOffer(flow) => flow.handle(input, store).await,
            ActiveFlow::CreateSource(flow) => flow.handle(input, store).await,
            ActiveFlow::EditOffer(flow) => flow.handle(input, store).await,
            ActiveFlow::EditSource(flow) => flow.handle(input, store).await,
            ActiveFlow::Analysis(flow) => flow.handle(input, store).await,
            ActiveFlow::Report(flow) => flow.handle(input, store).await,
        }
    }
}

/// What the operator is asked when a given offer field is collected.
pub(crate) fn offer_prompt(field: OfferField) -> &'static str {
    match field {
        OfferField::Name => "Enter the offer name:",
        OfferField::Description => "Enter offer description:",
        OfferField::Payout => "Enter payout amount (USD):",
        OfferField::Geo => "Enter target GEO countries (comma-separated):",
        OfferField::Vertical => "Enter vertical (e.g. Games, Finance, E-commerce):",
        OfferField::Kpi => "Enter KPI requirements:",
        OfferField::Tracker => "Enter tracker:",
        OfferField::Antifraud => "Enter anti-fraud system:",
        OfferField::AppId => "Enter attribution app ID:",
        OfferField::EventName => "Enter qualifying event name:",
        OfferField::DailyLimit => "Enter daily traffic limit:",
    }
}

/// What the operator is asked when a given source field is collected.
pub(crate) fn source_prompt(field: SourceField) -> &'static str {
    match field {
        SourceField::Name => "Enter the traffic source name:",
        SourceField::Conversion => "Enter conversion rate (%):",
        SourceField::Cost => "Enter cost per unit (USD):",
        SourceField::Capacity => "Enter traffic capacity:",
        SourceField::Geo => "Enter covered GEO countries:",
        SourceField::Performance => "Enter performance notes:",
    }
}

/// Validate raw input for an offer field.
pub(crate) fn validate_offer_field(
    field: OfferField,
    raw: &str,
) -> Result<FieldValue, TraffikaError> {
    match field {
        OfferField::Payout => validators::parse_decimal(raw).map(FieldValue::Number),
        OfferField::DailyLimit => validators::parse_positive_int(raw).map(FieldValue::Integer),
        // Free-text fields are accepted verbatim.
        _ => Ok(FieldValue::Text(raw.to_string())),
    }
}

/// Validate raw input for a source field.
pub(crate) fn validate_source_field(
    field: SourceField,
    raw: &str,
) -> Result<FieldValue, TraffikaError> {
    match field {
        SourceField::Conversion | SourceField::Cost => {
            validators::parse_decimal(raw).map(FieldValue::Number)
        }
        SourceField::Capacity => validators::parse_positive_int(raw).map(FieldValue::Integer),
        _ => Ok(FieldValue::Text(raw.to_string())),
    }
}
