// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Revenue forecast: bucket events by day, fit a degree-2 polynomial to
//! daily revenue, and project seven days past the requested range.

use chrono::{Days, NaiveDate};

use traffika_core::{DateRange, TraffikaError};

use crate::dataset::{RawDataset, EVENT_TIME_COLUMN};
use crate::regression::{eval2, polyfit2};

/// Days projected beyond the requested range.
pub const FORECAST_HORIZON_DAYS: usize = 7;

/// Minimum history the regression needs.
const MIN_HISTORY_DAYS: i64 = 5;

/// Historical daily revenue plus the projected continuation.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    /// One point per day of the requested range, 0 for days without events.
    pub history: Vec<(NaiveDate, f64)>,
    /// Seven consecutive days after the range end, clamped at 0.
    pub projection: Vec<(NaiveDate, f64)>,
}

/// Compute the revenue forecast for one offer.
///
/// Revenue per day is `events_on_day * payout`. A range shorter than
/// five days fails with [`TraffikaError::InsufficientData`].
pub fn forecast(
    events: &RawDataset,
    payout: f64,
    range: DateRange,
) -> Result<ForecastSeries, TraffikaError> {
    if range.days() < MIN_HISTORY_DAYS {
        return Err(TraffikaError::InsufficientData(format!(
            "forecast needs at least {MIN_HISTORY_DAYS} days of history, got {}",
            range.days()
        )));
    }

    let buckets = events.bucket_by_date(EVENT_TIME_COLUMN);

    // Dense series over the closed range: days without events contribute 0.
    let history: Vec<(NaiveDate, f64)> = range
        .iter()
        .map(|date| {
            let count = buckets.get(&date).copied().unwrap_or(0);
            (date, count as f64 * payout)
        })
        .collect();

    let revenue: Vec<f64> = history.iter().map(|(_, r)| *r).collect();
    let coeffs = polyfit2(&revenue)
        .ok_or_else(|| TraffikaError::Internal("degenerate regression system".into()))?;

    let projection = (0..FORECAST_HORIZON_DAYS)
        .map(|offset| {
            let x = (history.len() + offset) as f64;
            let date = range
                .to
                .checked_add_days(Days::new(offset as u64 + 1))
                .ok_or_else(|| {
                    TraffikaError::Internal("forecast date out of calendar range".into())
                })?;
            // Revenue cannot be negative.
            Ok((date, eval2(&coeffs, x).max(0.0)))
        })
        .collect::<Result<Vec<_>, TraffikaError>>()?;

    Ok(ForecastSeries {
        history,
        projection,
    })
}
