// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ephemeral field accumulators for creation workflows.
//!
//! A draft lives exactly as long as one workflow instance: created on
//! start, destroyed on commit or cancellation, never shared across users.

use traffika_core::{
    FieldValue, NewOffer, NewTrafficSource, OfferField, SourceField, TraffikaError,
};

/// Accumulates validated offer fields in creation order.
#[derive(Debug, Default, Clone)]
pub struct OfferDraft {
    name: Option<String>,
    description: Option<String>,
    payout: Option<f64>,
    geo: Option<String>,
    vertical: Option<String>,
    kpi: Option<String>,
    tracker: Option<String>,
    antifraud: Option<String>,
    attribution_app_id: Option<String>,
    attribution_event: Option<String>,
    daily_limit: Option<i64>,
}

impl OfferDraft {
    /// Record one validated field value.
    pub fn apply(&mut self, field: OfferField, value: FieldValue) -> Result<(), TraffikaError> {
        match (field, value) {
            (OfferField::Name, FieldValue::Text(s)) => self.name = Some(s),
            (OfferField::Description, FieldValue::Text(s)) => self.description = Some(s),
            (OfferField::Payout, FieldValue::Number(n)) => self.payout = Some(n),
            (OfferField::Geo, FieldValue::Text(s)) => self.geo = Some(s),
            (OfferField::Vertical, FieldValue::Text(s)) => self.vertical = Some(s),
            (OfferField::Kpi, FieldValue::Text(s)) => self.kpi = Some(s),
            (OfferField::Tracker, FieldValue::Text(s)) => self.tracker = Some(s),
            (OfferField::Antifraud, FieldValue::Text(s)) => self.antifraud = Some(s),
            (OfferField::AppId, FieldValue::Text(s)) => self.attribution_app_id = Some(s),
            (OfferField::EventName, FieldValue::Text(s)) => self.attribution_event = Some(s),
            (OfferField::DailyLimit, FieldValue::Integer(i)) => self.daily_limit = Some(i),
            (field, value) => {
                return Err(TraffikaError::Internal(format!(
                    "validator produced {value:?} for offer field {field}"
                )))
            }
        }
        Ok(())
    }

    /// Convert the draft into an insert-shaped offer. Every field must
    /// have been applied; the creation flow guarantees this by walking
    /// the fixed order to completion.
    pub fn complete(self) -> Result<NewOffer, TraffikaError> {
        let missing =
            || TraffikaError::Internal("offer draft completed with missing fields".into());
        Ok(NewOffer {
            name: self.name.ok_or_else(missing)?,
            description: self.description.ok_or_else(missing)?,
            payout: self.payout.ok_or_else(missing)?,
            geo: self.geo.ok_or_else(missing)?,
            vertical: self.vertical.ok_or_else(missing)?,
            kpi: self.kpi.ok_or_else(missing)?,
            tracker: self.tracker.ok_or_else(missing)?,
            antifraud: self.antifraud.ok_or_else(missing)?,
            attribution_app_id: self.attribution_app_id.ok_or_else(missing)?,
            attribution_event: self.attribution_event.ok_or_else(missing)?,
            daily_limit: self.daily_limit.ok_or_else(missing)?,
        })
    }
}

/// Accumulates validated traffic source fields in creation order.
#[derive(Debug, Default, Clone)]
pub struct SourceDraft {
    name: Option<String>,
    conversion: Option<f64>,
    cost: Option<f64>,
    capacity: Option<i64>,
    geo: Option<String>,
    performance: Option<String>,
}

impl SourceDraft {
    /// Record one validated field value.
    pub fn apply(&mut self, field: SourceField, value: FieldValue) -> Result<(), TraffikaError> {
        match (field, value) {
            (SourceField::Name, FieldValue::Text(s)) => self.name = Some(s),
            (SourceField::Conversion, FieldValue::Number(n)) => self.conversion = Some(n),
            (SourceField::Cost, FieldValue::Number(n)) => self.cost = Some(n),
            (SourceField::Capacity, FieldValue::Integer(i)) => self.capacity = Some(i),
            (SourceField::Geo, FieldValue::Text(s)) => self.geo = Some(s),
            (SourceField::Performance, FieldValue::Text(s)) => self.performance = Some(s),
            (field, value) => {
                return Err(TraffikaError::Internal(format!(
                    "validator produced {value:?} for source field {field}"
                )))
            }
        }
        Ok(())
    }

    /// Convert the draft into an insert-shaped traffic source.
    pub fn complete(self) -> Result<NewTrafficSource, TraffikaError> {
        let missing =
            || TraffikaError::Internal("source draft completed with missing fields".into());
        Ok(NewTrafficSource {
            name: self.name.ok_or_else(missing)?,
            conversion: self.conversion.ok_or_else(missing)?,
            cost: self.cost.ok_or_else(missing)?,
            capacity: self.capacity.ok_or_else(missing)?,
            geo: self.geo.ok_or_else(missing)?,
            performance: self.performance.ok_or_else(missing)?,
        })
    }
}
