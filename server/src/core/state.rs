//! Server state

use std::path::PathBuf;
use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::activity::ActivityService;
use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{DbService, migrate, seed};

/// Shared server state - cheap to clone, one instance per process
///
/// | Field | Description |
/// |-------|-------------|
/// | config | immutable configuration |
/// | db | embedded SurrealDB handle |
/// | jwt_service | token signing/verification |
/// | activity | fire-and-forget admin activity recorder |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub activity: ActivityService,
}

impl ServerState {
    /// Build state around an already-open database handle.
    /// Used by tests (in-memory engine) and by `initialize`.
    pub fn with_db(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let activity = ActivityService::new(db.clone());
        Self {
            config,
            db,
            jwt_service,
            activity,
        }
    }

    /// Initialize the full server state, in order:
    /// 1. work directory layout
    /// 2. embedded database (work_dir/database/verdant.db)
    /// 3. seed data (permission catalog, system roles, settings, admin)
    /// 4. one-time legacy catalog backfill
    ///
    /// # Panics
    ///
    /// Panics when the database cannot be opened or seeded - the server is
    /// not allowed to come up half-initialized.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_dir().join("verdant.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");
        let db = db_service.db;

        seed::ensure_seed_data(&db)
            .await
            .expect("Failed to seed database");
        migrate::backfill_catalog_refs(&db)
            .await
            .expect("Legacy catalog backfill failed");

        Self::with_db(config.clone(), db)
    }

    /// Get the database handle
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    /// Get the JWT service
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// Get the work directory
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }
}
