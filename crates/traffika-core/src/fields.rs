// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed enumerations of editable entity fields.
//!
//! These enums are the only path by which a field name reaches a storage
//! statement: every variant carries its fixed column name, so arbitrary
//! strings can never be interpolated into SQL.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A validated value ready to be bound into a storage statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Integer(i64),
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
        }
    }
}

/// Editable fields of an [`Offer`](crate::Offer).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OfferField {
    Name,
    Description,
    Payout,
    Geo,
    Vertical,
    Kpi,
    Tracker,
    Antifraud,
    AppId,
    EventName,
    DailyLimit,
}

impl OfferField {
    /// The fixed field-collection order of the offer creation workflow.
    pub const CREATE_ORDER: [OfferField; 11] = [
        OfferField::Name,
        OfferField::Description,
        OfferField::Payout,
        OfferField::Geo,
        OfferField::Vertical,
        OfferField::Kpi,
        OfferField::Tracker,
        OfferField::Antifraud,
        OfferField::AppId,
        OfferField::EventName,
        OfferField::DailyLimit,
    ];

    /// Storage column this field maps to.
    pub fn column(self) -> &'static str {
        match self {
            OfferField::Name => "name",
            OfferField::Description => "description",
            OfferField::Payout => "payout",
            OfferField::Geo => "geo",
            OfferField::Vertical => "vertical",
            OfferField::Kpi => "kpi",
            OfferField::Tracker => "tracker",
            OfferField::Antifraud => "antifraud",
            OfferField::AppId => "attribution_app_id",
            OfferField::EventName => "attribution_event",
            OfferField::DailyLimit => "daily_limit",
        }
    }

    /// Human label used in menus and edit prompts.
    pub fn label(self) -> &'static str {
        match self {
            OfferField::Name => "Name",
            OfferField::Description => "Description",
            OfferField::Payout => "Payout",
            OfferField::Geo => "GEO",
            OfferField::Vertical => "Vertical",
            OfferField::Kpi => "KPI",
            OfferField::Tracker => "Tracker",
            OfferField::Antifraud => "Anti-fraud",
            OfferField::AppId => "Attribution app ID",
            OfferField::EventName => "Event name",
            OfferField::DailyLimit => "Daily limit",
        }
    }
}

/// Editable fields of a [`TrafficSource`](crate::TrafficSource).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SourceField {
    Name,
    Conversion,
    Cost,
    Capacity,
    Geo,
    Performance,
}

impl SourceField {
    /// The fixed field-collection order of the source creation workflow.
    pub const CREATE_ORDER: [SourceField; 6] = [
        SourceField::Name,
        SourceField::Conversion,
        SourceField::Cost,
        SourceField::Capacity,
        SourceField::Geo,
        SourceField::Performance,
    ];

    /// Storage column this field maps to.
    pub fn column(self) -> &'static str {
        match self {
            SourceField::Name => "name",
            SourceField::Conversion => "conversion",
            SourceField::Cost => "cost",
            SourceField::Capacity => "capacity",
            SourceField::Geo => "geo",
            SourceField::Performance => "performance",
        }
    }

    /// Human label used in menus and edit prompts.
    pub fn label(self) -> &'static str {
        match self {
            SourceField::Name => "Name",
            SourceField::Conversion => "Conversion rate",
            SourceField::Cost => "Cost",
            SourceField::Capacity => "Capacity",
            SourceField::Geo => "GEO",
            SourceField::Performance => "Performance notes",
        }
    }
}
