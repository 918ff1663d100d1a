//! Repository Module
//!
//! CRUD operations over the SurrealDB tables, one repository per table.

// Auth
pub mod permission;
pub mod role;
pub mod user;

// Catalog
pub mod brand;
pub mod category;
pub mod certification;
pub mod product;

// Commerce
pub mod order;
pub mod store_settings;

// System
pub mod activity_log;

pub use activity_log::ActivityLogRepository;
pub use brand::BrandRepository;
pub use category::CategoryRepository;
pub use certification::CertificationRepository;
pub use order::OrderRepository;
pub use permission::PermissionRepository;
pub use product::ProductRepository;
pub use role::RoleRepository;
pub use store_settings::StoreSettingsRepository;
pub use user::UserRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Administrative operation referenced a role that does not exist
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// Administrative operation referenced permissions that do not exist
    /// (or are inactive)
    #[error("Permission not found: {0}")]
    PermissionNotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    Business(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" strings across the whole stack
// =============================================================================
//
// All IDs are surrealdb::RecordId:
//   - parse:       let id: RecordId = "product:abc".parse()?;
//   - construct:   let id = RecordId::from_table_key("product", "abc");
//   - table name:  id.table()
//   - bare key:    id.key().to_string()
//   - CRUD:        db.select(id) / db.delete(id) take RecordId directly

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    /// Parse a "table:id" string, rejecting ids from a different table
    pub fn parse_id(&self, table: &str, id: &str) -> RepoResult<surrealdb::RecordId> {
        let record: surrealdb::RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if record.table() != table {
            return Err(RepoError::Validation(format!(
                "Invalid {} ID: {}",
                table, id
            )));
        }
        Ok(record)
    }
}
