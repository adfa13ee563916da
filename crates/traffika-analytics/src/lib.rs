// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analytics pipeline for the Traffika bot.
//!
//! Transforms raw CSV attribution reports into conversion-rate, revenue
//! forecast, and install-trend artifacts, then renders each as a PNG
//! chart. The pipeline performs no I/O: callers fetch the raw bytes
//! through the attribution client and pass datasets in.

pub mod chart;
pub mod conversion;
pub mod dataset;
pub mod forecast;
pub mod regression;
pub mod trend;

pub use conversion::{conversion_rate, ConversionSummary};
pub use dataset::{RawDataset, EVENT_TIME_COLUMN, INSTALL_TIME_COLUMN};
pub use forecast::{forecast, ForecastSeries, FORECAST_HORIZON_DAYS};
pub use trend::{trend, TrendSeries};
