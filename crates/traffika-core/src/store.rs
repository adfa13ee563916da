// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`EntityStore`] trait -- the seam between the workflow engine and
//! the persistence backend.

use async_trait::async_trait;

use crate::error::TraffikaError;
use crate::fields::{FieldValue, OfferField, SourceField};
use crate::types::{NewOffer, NewTrafficSource, Offer, Role, TrafficSource};

/// CRUD over offers, traffic sources, and user/role rows.
///
/// `get_*` on an unknown id returns `Ok(None)`; `delete_*` and
/// `update_*_field` on an unknown id are no-ops reporting zero rows
/// affected. Only single-statement atomicity is assumed.
#[async_trait]
pub trait EntityStore: Send + Sync {
    // --- Offers ---

    /// Inserts one offer row and returns its store-assigned id.
    async fn create_offer(&self, offer: &NewOffer) -> Result<i64, TraffikaError>;

    async fn list_offers(&self) -> Result<Vec<Offer>, TraffikaError>;

    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, TraffikaError>;

    /// Updates a single column, returning the number of rows affected.
    async fn update_offer_field(
        &self,
        id: i64,
        field: OfferField,
        value: FieldValue,
    ) -> Result<u64, TraffikaError>;

    async fn delete_offer(&self, id: i64) -> Result<u64, TraffikaError>;

    // --- Traffic sources ---

    /// Inserts one traffic source row and returns its store-assigned id.
    async fn create_source(&self, source: &NewTrafficSource) -> Result<i64, TraffikaError>;

    async fn list_sources(&self) -> Result<Vec<TrafficSource>, TraffikaError>;

    async fn get_source(&self, id: i64) -> Result<Option<TrafficSource>, TraffikaError>;

    /// Updates a single column, returning the number of rows affected.
    async fn update_source_field(
        &self,
        id: i64,
        field: SourceField,
        value: FieldValue,
    ) -> Result<u64, TraffikaError>;

    async fn delete_source(&self, id: i64) -> Result<u64, TraffikaError>;

    // --- Users ---

    /// Role lookup, defaulting to [`Role::Partner`] for unknown users.
    async fn user_role(&self, user_id: i64) -> Result<Role, TraffikaError>;

    /// Idempotent update-by-username; returns whether any row was affected.
    async fn set_user_role(&self, username: &str, role: Role) -> Result<bool, TraffikaError>;

    /// Creates a user row, silently ignoring a duplicate-identity conflict.
    async fn create_user(
        &self,
        user_id: i64,
        username: &str,
        role: Role,
    ) -> Result<(), TraffikaError>;
}
