//! Database Module
//!
//! Embedded SurrealDB storage: connection setup, models, repositories,
//! the seed routine and the one-time legacy backfill.

pub mod migrate;
pub mod models;
pub mod repository;
pub mod seed;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem, RocksDb};

const NAMESPACE: &str = "verdant";
const DATABASE: &str = "store";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the on-disk database at `db_path`
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {}", e)))?;

        tracing::info!(path = %db_path, "Database connection established (SurrealDB/RocksDB)");

        Ok(Self { db })
    }

    /// In-memory database handle for tests and local experiments
    pub async fn open_in_memory() -> Result<Surreal<Db>, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::Database(format!("Failed to open in-memory db: {}", e)))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::Database(format!("Failed to select namespace: {}", e)))?;

        Ok(db)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_on_disk_database_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("verdant.db");
        let path_str = path.to_string_lossy().to_string();

        {
            let service = DbService::new(&path_str).await.expect("open");
            service
                .db
                .query("CREATE brand SET name = 'Vital Farms', slug = 'vital-farms', description = '', logo = '', website = '', is_verified = true")
                .await
                .expect("insert");
        }

        let service = DbService::new(&path_str).await.expect("reopen");
        let brands: Vec<crate::db::models::Brand> = service
            .db
            .query("SELECT * FROM brand")
            .await
            .expect("query")
            .take(0)
            .expect("take");
        assert_eq!(brands.len(), 1);
        assert_eq!(brands[0].slug, "vital-farms");
    }
}
