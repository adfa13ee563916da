// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-field parse/validate rules.
//!
//! A failure here re-prompts the current workflow state; the failed input
//! is discarded, not retried.

use chrono::NaiveDate;
use traffika_core::{DateRange, TraffikaError};

/// Parse a decimal amount (payout, cost, conversion rate).
///
/// Negative values are accepted on purpose: clawback offers carry
/// negative payouts upstream.
pub fn parse_decimal(raw: &str) -> Result<f64, TraffikaError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| TraffikaError::Validation("please enter a valid number".into()))?;
    if !value.is_finite() {
        return Err(TraffikaError::Validation("please enter a valid number".into()));
    }
    Ok(value)
}

/// Parse a strictly positive integer (daily limit, capacity).
pub fn parse_positive_int(raw: &str) -> Result<i64, TraffikaError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| TraffikaError::Validation("please enter a whole number".into()))?;
    if value <= 0 {
        return Err(TraffikaError::Validation(
            "the value must be greater than zero".into(),
        ));
    }
    Ok(value)
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TraffikaError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| TraffikaError::Validation("invalid date format, use YYYY-MM-DD".into()))
}

/// Parse two whitespace-separated `YYYY-MM-DD` dates with `from <= to`.
pub fn parse_date_range(raw: &str) -> Result<DateRange, TraffikaError> {
    let parts: Vec<&str> = raw.split_whitespace().collect();
    if parts.len() != 2 {
        return Err(TraffikaError::Validation(
            "enter two dates separated by a space, e.g. 2024-01-01 2024-01-31".into(),
        ));
    }
    let from = parse_date(parts[0])?;
    let to = parse_date(parts[1])?;
    DateRange::new(from, to)
}
