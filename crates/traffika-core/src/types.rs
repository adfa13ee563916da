// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain records and request types shared across the Traffika workspace.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Operator role. Unknown users default to [`Role::Partner`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Partner,
}

/// A persisted offer row.
///
/// `attribution_app_id` and `attribution_event` identify the offer in the
/// external attribution service; both must be present before any analytics
/// can run against the offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Currency amount paid per qualifying event. May be negative (clawback
    /// offers exist upstream); the validator deliberately does not reject them.
    pub payout: f64,
    pub geo: String,
    pub vertical: String,
    pub kpi: String,
    pub tracker: String,
    pub antifraud: String,
    pub created_at: String,
    pub attribution_app_id: Option<String>,
    pub attribution_event: Option<String>,
    /// Daily traffic cap. Strictly positive when present.
    pub daily_limit: Option<i64>,
}

impl Offer {
    /// Returns the attribution identifiers, or `None` if either is missing.
    pub fn attribution_ids(&self) -> Option<(&str, &str)> {
        match (
            self.attribution_app_id.as_deref(),
            self.attribution_event.as_deref(),
        ) {
            (Some(app), Some(event)) if !app.is_empty() && !event.is_empty() => {
                Some((app, event))
            }
            _ => None,
        }
    }
}

/// Insert-shaped offer produced by a completed creation draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOffer {
    pub name: String,
    pub description: String,
    pub payout: f64,
    pub geo: String,
    pub vertical: String,
    pub kpi: String,
    pub tracker: String,
    pub antifraud: String,
    pub attribution_app_id: String,
    pub attribution_event: String,
    pub daily_limit: i64,
}

/// A persisted traffic source row (an ad network or similar channel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficSource {
    pub id: i64,
    pub name: String,
    /// Conversion rate as a percentage.
    pub conversion: f64,
    /// Currency cost per unit of traffic.
    pub cost: f64,
    /// Integer traffic ceiling.
    pub capacity: i64,
    pub geo: String,
    pub performance: String,
    pub created_at: String,
}

/// Insert-shaped traffic source produced by a completed creation draft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrafficSource {
    pub name: String,
    pub conversion: f64,
    pub cost: f64,
    pub capacity: i64,
    pub geo: String,
    pub performance: String,
}

/// A chat user known to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    /// External chat identity.
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub created_at: String,
}

/// An inclusive calendar date range with `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// Builds a range, rejecting `to < from`.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, crate::TraffikaError> {
        if to < from {
            return Err(crate::TraffikaError::Validation(
                "'to' date must not be before 'from' date".into(),
            ));
        }
        Ok(Self { from, to })
    }

    /// Number of calendar days covered, inclusive of both endpoints.
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// Iterates every date in the range in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.from.iter_days().take(self.days() as usize)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.from, self.to)
    }
}

/// The three analytics the pipeline can produce.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    Conversion,
    Forecast,
    Trend,
}

/// A fully collected analytics request. Ephemeral; nothing analytic is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub kind: AnalysisKind,
    pub offer_id: i64,
    pub range: DateRange,
    /// `None` aggregates all traffic sources.
    pub media_source: Option<String>,
}

/// Report kinds the `/report` conversation can produce.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Installs,
    Events,
    PostAttribution,
    Summary,
}

/// Additional-columns selection for raw attribution reports.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraFields {
    /// The service's default column set.
    #[default]
    Default,
    /// Every additional column the service can emit.
    All,
    /// An explicit comma-separated column list.
    Custom(String),
}

/// A fully collected report request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub offer_id: i64,
    pub range: DateRange,
    /// Event name override for in-app-event reports. `None` uses the offer's own event.
    pub event_name: Option<String>,
    /// Additional report columns to request.
    pub extra_fields: ExtraFields,
}
