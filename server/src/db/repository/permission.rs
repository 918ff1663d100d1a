//! Permission Repository
//!
//! Permissions are seeded from the static catalog and never deleted; the
//! only mutation in normal operation is toggling the active flag.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Permission, PermissionId};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct PermissionRepository {
    base: BaseRepository,
}

impl PermissionRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All active permissions, grouped the way the admin UI lists them
    pub async fn find_all(&self) -> RepoResult<Vec<Permission>> {
        let permissions: Vec<Permission> = self
            .base
            .db()
            .query("SELECT * FROM permission WHERE is_active = true ORDER BY category, resource, action")
            .await?
            .take(0)?;
        Ok(permissions)
    }

    /// All permissions including deactivated ones
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Permission>> {
        let permissions: Vec<Permission> = self
            .base
            .db()
            .query("SELECT * FROM permission ORDER BY category, resource, action")
            .await?
            .take(0)?;
        Ok(permissions)
    }

    /// Find permission by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Permission>> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM permission WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug))
            .await?;
        let permissions: Vec<Permission> = result.take(0)?;
        Ok(permissions.into_iter().next())
    }

    /// Resolve catalog slugs to permission references.
    ///
    /// Every slug must name an existing, active permission; otherwise the
    /// whole resolution fails so a partial grant never slips through.
    pub async fn resolve_slugs(&self, slugs: &[String]) -> RepoResult<Vec<PermissionId>> {
        if slugs.is_empty() {
            return Ok(vec![]);
        }

        let wanted = slugs.to_vec();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM permission WHERE slug IN $slugs AND is_active = true")
            .bind(("slugs", wanted))
            .await?;
        let found: Vec<Permission> = result.take(0)?;

        if found.len() != slugs.len() {
            let missing: Vec<&str> = slugs
                .iter()
                .filter(|s| !found.iter().any(|p| &p.slug == *s))
                .map(|s| s.as_str())
                .collect();
            return Err(RepoError::PermissionNotFound(format!(
                "Unknown or inactive permissions: {}",
                missing.join(", ")
            )));
        }

        Ok(found.into_iter().filter_map(|p| p.id).collect())
    }

    /// Toggle a permission's active flag
    pub async fn set_active(&self, slug: &str, is_active: bool) -> RepoResult<Permission> {
        let slug_owned = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("UPDATE permission SET is_active = $is_active WHERE slug = $slug RETURN AFTER")
            .bind(("slug", slug_owned))
            .bind(("is_active", is_active))
            .await?;

        result
            .take::<Vec<Permission>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| {
                RepoError::PermissionNotFound(format!("Permission '{}' not found", slug))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::catalog::PERMISSION_CATALOG;
    use crate::db::{DbService, seed};

    async fn test_repo() -> PermissionRepository {
        let db = DbService::open_in_memory().await.expect("db");
        seed::ensure_seed_data(&db).await.expect("seed");
        PermissionRepository::new(db)
    }

    #[tokio::test]
    async fn test_catalog_fully_seeded() {
        let repo = test_repo().await;
        let all = repo.find_all().await.expect("find_all");
        assert_eq!(all.len(), PERMISSION_CATALOG.len());
    }

    #[tokio::test]
    async fn test_resolve_rejects_unknown_slug() {
        let repo = test_repo().await;
        let err = repo
            .resolve_slugs(&["orders.read".to_string(), "orders.teleport".to_string()])
            .await
            .unwrap_err();
        match err {
            RepoError::PermissionNotFound(msg) => assert!(msg.contains("orders.teleport")),
            other => panic!("expected PermissionNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deactivated_permission_not_resolvable() {
        let repo = test_repo().await;
        repo.set_active("orders.refund", false).await.expect("toggle");

        let err = repo
            .resolve_slugs(&["orders.refund".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::PermissionNotFound(_)));

        // And it disappears from the active listing
        let active = repo.find_all().await.expect("find_all");
        assert!(!active.iter().any(|p| p.slug == "orders.refund"));
    }
}
