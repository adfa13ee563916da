// SPDX-FileCopyrightText: 2026 Traffika Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the [`EntityStore`] trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use traffika_config::model::StorageConfig;
use traffika_core::{
    EntityStore, FieldValue, NewOffer, NewTrafficSource, Offer, OfferField, Role, SourceField,
    TraffikaError, TrafficSource,
};

use crate::database::Database;
use crate::queries;

/// SQLite-backed entity store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query modules. The database is lazily opened on the first call
/// to [`SqliteStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    ///
    /// [`initialize`]: SqliteStore::initialize
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Open the database, run migrations.
    pub async fn initialize(&self) -> Result<(), TraffikaError> {
        let db = Database::open(&self.config.database_path).await?;
        self.db.set(db).map_err(|_| TraffikaError::Internal(
            "storage already initialized".into(),
        ))?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    /// Seed the bootstrap admin row. Safe to call on every start: a
    /// duplicate identity is swallowed by [`create_user`].
    ///
    /// [`create_user`]: EntityStore::create_user
    pub async fn seed_admin(&self, user_id: i64, username: &str) -> Result<(), TraffikaError> {
        self.create_user(user_id, username, Role::Admin).await
    }

    /// Checkpoint the WAL and release the handle.
    pub async fn close(&self) -> Result<(), TraffikaError> {
        self.db()?.close().await
    }

    fn db(&self) -> Result<&Database, TraffikaError> {
        self.db.get().ok_or_else(|| {
            TraffikaError::Internal("storage not initialized -- call initialize() first".into())
        })
    }
}

#[async_trait]
impl EntityStore for SqliteStore {
    async fn create_offer(&self, offer: &NewOffer) -> Result<i64, TraffikaError> {
        queries::offers::create_offer(self.db()?, offer).await
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, TraffikaError> {
        queries::offers::list_offers(self.db()?).await
    }

    async fn get_offer(&self, id: i64) -> Result<Option<Offer>, TraffikaError> {
        queries::offers::get_offer(self.db()?, id).await
    }

    async fn update_offer_field(
        &self,
        id: i64,
        field: OfferField,
        value: FieldValue,
    ) -> Result<u64, TraffikaError> {
        queries::offers::update_offer_field(self.db()?, id, field, value).await
    }

    async fn delete_offer(&self, id: i64) -> Result<u64, TraffikaError> {
        queries::offers::delete_offer(self.db()?, id).await
    }

    async fn create_source(&self, source: &NewTrafficSource) -> Result<i64, TraffikaError> {
        queries::sources::create_source(self.db()?, source).await
    }

    async fn list_sources(&self) -> Result<Vec<TrafficSource>, TraffikaError> {
        queries::sources::list_sources(self.db()?).await
    }

    async fn get_source(&self, id: i64) -> Result<Option<TrafficSource>, TraffikaError> {
        queries::sources::get_source(self.db()?, id).await
    }

    async fn update_source_field(
        &self,
        id: i64,
        field: SourceField,
        value: FieldValue,
    ) -> Result<u64, TraffikaError> {
        queries::sources::update_source_field(self.db()?, id, field, value).await
    }

    async fn delete_source(&self, id: i64) -> Result<u64, TraffikaError> {
        queries::sources::delete_source(self.db()?, id).await
    }

    async fn user_role(&self, user_id: i64) -> Result<Role, TraffikaError> {
        queries::users::user_role(self.db()?, user_id).await
    }

    async fn set_user_role(&self, username: &str, role: Role) -> Result<bool, TraffikaError> {
        queries::users::set_user_role(self.db()?, username, role).await
    }

    async fn create_user(
        &self,
        user_id: i64,
        username: &str,
        role: Role,
    ) -> Result<(), TraffikaError> {
        queries::users::create_user(self.db()?, user_id, username, role).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
        }
    }

    async fn make_store(dir: &tempfile::TempDir, name: &str) -> SqliteStore {
        let db_path = dir.path().join(name);
        let store = SqliteStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();
        store
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir, "double_init.db").await;
        assert!(store.initialize().await.is_err());
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let store = SqliteStore::new(make_config("/nonexistent/never-opened.db"));
        assert!(store.list_offers().await.is_err());
    }

    #[tokio::test]
    async fn seed_admin_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir, "seed.db").await;

        store.seed_admin(100, "root").await.unwrap();
        store.seed_admin(100, "root").await.unwrap();
        assert_eq!(store.user_role(100).await.unwrap(), Role::Admin);
    }

    #[tokio::test]
    async fn full_offer_lifecycle_through_store_trait() {
        let dir = tempdir().unwrap();
        let store = make_store(&dir, "lifecycle.db").await;

        let id = store
            .create_offer(&NewOffer {
                name: "Casino Royale".into(),
                description: "iGaming CPA".into(),
                payout: 40.0,
                geo: "DE".into(),
                vertical: "Gambling".into(),
                kpi: "baseline deposit".into(),
                tracker: "keitaro".into(),
                antifraud: "fraudscore".into(),
                attribution_app_id: "id123456".into(),
                attribution_event: "first_deposit".into(),
                daily_limit: 200,
            })
            .await
            .unwrap();

        let offer = store.get_offer(id).await.unwrap().unwrap();
        assert_eq!(offer.name, "Casino Royale");

        store
            .update_offer_field(id, OfferField::Payout, FieldValue::Number(45.0))
            .await
            .unwrap();
        let offer = store.get_offer(id).await.unwrap().unwrap();
        assert_eq!(offer.payout, 45.0);

        assert_eq!(store.delete_offer(id).await.unwrap(), 1);
        assert!(store.get_offer(id).await.unwrap().is_none());
    }
}
