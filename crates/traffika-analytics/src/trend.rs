// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Install trend: per-day install counts, sparse and ascending.

use chrono::NaiveDate;

use traffika_core::TraffikaError;

use crate::dataset::{RawDataset, INSTALL_TIME_COLUMN};

/// Install counts for the days that had at least one install. No dense
/// fill: a day without records has no point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendSeries {
    /// Ascending by date.
    pub points: Vec<(NaiveDate, u64)>,
}

/// Compute the install trend from an installs report.
///
/// Fails with [`TraffikaError::InsufficientData`] when no record carries
/// a parseable date.
pub fn trend(installs: &RawDataset) -> Result<TrendSeries, TraffikaError> {
    let buckets = installs.bucket_by_date(INSTALL_TIME_COLUMN);
    if buckets.is_empty() {
        return Err(TraffikaError::InsufficientData(
            "no dated install records in the period".into(),
        ));
    }
    // BTreeMap iteration is already ascending by date.
    Ok(TrendSeries {
        points: buckets.into_iter().collect(),
    })
}
