//! Store Settings Repository (singleton)
//!
//! The singleton record is created once by the seed step at process start;
//! request paths only read or merge-update it. There is deliberately no
//! lazy get-or-create in the hot path so initialization order stays
//! deterministic.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{StoreSettings, StoreSettingsUpdate};
use crate::utils::time::now_millis;
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

const TABLE: &str = "store_settings";
const SINGLETON_ID: &str = "main";

#[derive(Clone)]
pub struct StoreSettingsRepository {
    base: BaseRepository,
}

impl StoreSettingsRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create the singleton with defaults if it does not exist yet.
    /// Called once from the seed routine.
    pub async fn init_defaults(&self) -> RepoResult<StoreSettings> {
        if let Some(settings) = self.try_get().await? {
            return Ok(settings);
        }

        let mut defaults = StoreSettings::default();
        defaults.updated_at = now_millis();

        let created: Option<StoreSettings> = self
            .base
            .db()
            .create((TABLE, SINGLETON_ID))
            .content(defaults)
            .await?;
        created.ok_or_else(|| RepoError::Database("Failed to create store settings".to_string()))
    }

    /// Read the singleton; errors if the seed step never ran
    pub async fn get(&self) -> RepoResult<StoreSettings> {
        self.try_get().await?.ok_or_else(|| {
            RepoError::Database("Store settings not initialized (seed step missing)".to_string())
        })
    }

    async fn try_get(&self) -> RepoResult<Option<StoreSettings>> {
        let settings: Option<StoreSettings> =
            self.base.db().select((TABLE, SINGLETON_ID)).await?;
        Ok(settings)
    }

    /// Merge-update the singleton
    pub async fn update(&self, data: StoreSettingsUpdate) -> RepoResult<StoreSettings> {
        // Read first so a missing singleton surfaces as the seed error
        self.get().await?;

        let singleton_id = RecordId::from_table_key(TABLE, SINGLETON_ID);
        let _ = self
            .base
            .db()
            .query("UPDATE $id SET updated_at = $now")
            .bind(("id", singleton_id.clone()))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<StoreSettings> =
            self.base.db().update(singleton_id).merge(data).await?;
        updated.ok_or_else(|| RepoError::Database("Failed to update store settings".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use rust_decimal::Decimal;

    #[tokio::test]
    async fn test_get_before_init_fails() {
        let db = DbService::open_in_memory().await.expect("db");
        let repo = StoreSettingsRepository::new(db);

        assert!(repo.get().await.is_err());
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let db = DbService::open_in_memory().await.expect("db");
        let repo = StoreSettingsRepository::new(db);

        let first = repo.init_defaults().await.expect("init");
        repo.update(StoreSettingsUpdate {
            store_name: Some("Rebranded".to_string()),
            ..Default::default()
        })
        .await
        .expect("update");

        // A second init must not clobber edits
        let again = repo.init_defaults().await.expect("init");
        assert_eq!(again.store_name, "Rebranded");
        assert_eq!(first.currency, again.currency);
    }

    #[tokio::test]
    async fn test_merge_update_preserves_other_fields() {
        let db = DbService::open_in_memory().await.expect("db");
        let repo = StoreSettingsRepository::new(db);
        repo.init_defaults().await.expect("init");

        let updated = repo
            .update(StoreSettingsUpdate {
                min_order_amount: Some(Decimal::new(1500, 2)),
                allow_registration: Some(false),
                ..Default::default()
            })
            .await
            .expect("update");

        assert_eq!(updated.min_order_amount, Decimal::new(1500, 2));
        assert!(!updated.allow_registration);
        assert_eq!(updated.store_name, "Verdant Organic Store");
    }
}
