// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion rate: qualifying events per install, as a percentage.

use crate::dataset::RawDataset;

/// The computed conversion figures for one offer and period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionSummary {
    pub installs: u64,
    pub events: u64,
    /// `events / installs * 100`, or `0` when there were no installs.
    pub rate: f64,
}

/// Compute the conversion rate from an installs and an events report.
pub fn conversion_rate(installs: &RawDataset, events: &RawDataset) -> ConversionSummary {
    let installs_count = installs.record_count();
    let events_count = events.record_count();
    let rate = if installs_count == 0 {
        0.0
    } else {
        (events_count as f64 / installs_count as f64) * 100.0
    };
    ConversionSummary {
        installs: installs_count,
        events: events_count,
        rate,
    }
}
