// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Traffika affiliate-marketing bot.
//!
//! This crate provides the error taxonomy, domain records, field
//! enumerations, and the [`EntityStore`] trait that the workflow engine
//! and the SQLite backend meet at. It has no I/O of its own.

pub mod error;
pub mod fields;
pub mod store;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::TraffikaError;
pub use fields::{FieldValue, OfferField, SourceField};
pub use store::EntityStore;
pub use types::{
    AnalysisKind, AnalysisRequest, DateRange, ExtraFields, NewOffer, NewTrafficSource, Offer,
    ReportKind, ReportRequest, Role, TrafficSource, UserAccount,
};
