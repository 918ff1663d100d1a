//! Role Repository
//!
//! System roles (super-admin, store-manager, customer) are protected: their
//! identity fields cannot be changed through the update path and they can
//! never be deleted. Any role still referenced by users is also undeletable.

use super::{BaseRepository, PermissionRepository, RepoError, RepoResult, UserRepository};
use crate::db::models::PermissionId;
use crate::db::models::{Role, RoleCreate, RoleDetail, RoleUpdate};
use serde::Serialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "role";

/// Partial update document, merged into the record.
/// Record ids serialize natively here so they land as links, not strings.
#[derive(Debug, Default, Serialize)]
struct RolePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<Vec<PermissionId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
}

#[derive(Clone)]
pub struct RoleRepository {
    base: BaseRepository,
}

impl RoleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All roles ordered by privilege, permissions materialized
    pub async fn find_all(&self) -> RepoResult<Vec<RoleDetail>> {
        let roles: Vec<RoleDetail> = self
            .base
            .db()
            .query("SELECT * FROM role ORDER BY level FETCH permissions")
            .await?
            .take(0)?;
        Ok(roles)
    }

    /// Find role by id (permission references unresolved)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Role>> {
        let record = self.base.parse_id(TABLE, id)?;
        let role: Option<Role> = self.base.db().select(record).await?;
        Ok(role)
    }

    /// Find role by id with permissions materialized
    pub async fn find_detail(&self, id: &str) -> RepoResult<Option<RoleDetail>> {
        let record = self.base.parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM $role FETCH permissions")
            .bind(("role", record))
            .await?;
        let roles: Vec<RoleDetail> = result.take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Find role by slug
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Role>> {
        let slug = slug.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM role WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug))
            .await?;
        let roles: Vec<Role> = result.take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Create a new (non-system) role.
    ///
    /// Permission slugs are resolved against the seeded catalog. The level is
    /// accepted as given; level protection applies at the update boundary.
    pub async fn create(&self, data: RoleCreate) -> RepoResult<RoleDetail> {
        if self.find_by_slug(&data.slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Role with slug '{}' already exists",
                data.slug
            )));
        }

        let permissions = PermissionRepository::new(self.base.db().clone())
            .resolve_slugs(&data.permissions)
            .await?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE role SET
                    name = $name,
                    slug = $slug,
                    description = $description,
                    level = $level,
                    permissions = $permissions,
                    is_system = false,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("slug", data.slug))
            .bind(("description", data.description))
            .bind(("level", data.level))
            .bind(("permissions", permissions))
            .await?;

        let created: Option<Role> = result.take(0)?;
        let created =
            created.ok_or_else(|| RepoError::Database("Failed to create role".to_string()))?;
        let id = created
            .id
            .map(|i| i.to_string())
            .ok_or_else(|| RepoError::Database("Created role has no id".to_string()))?;

        self.find_detail(&id)
            .await?
            .ok_or_else(|| RepoError::RoleNotFound(format!("Role {} not found", id)))
    }

    /// Update a role.
    ///
    /// For system roles only the permission set and active flag may change;
    /// name, slug, level and description are locked down here (and only
    /// here - creation takes any level).
    pub async fn update(&self, id: &str, data: RoleUpdate) -> RepoResult<RoleDetail> {
        let record = self.base.parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::RoleNotFound(format!("Role {} not found", id)))?;

        if existing.is_system && data.touches_identity() {
            return Err(RepoError::Business(
                "Cannot modify system role properties".to_string(),
            ));
        }

        if let Some(level) = data.level
            && !(1..=10).contains(&level)
        {
            return Err(RepoError::Validation(format!(
                "Role level must be between 1 and 10, got {}",
                level
            )));
        }

        if let Some(ref new_slug) = data.slug
            && new_slug != &existing.slug
            && self.find_by_slug(new_slug).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Role with slug '{}' already exists",
                new_slug
            )));
        }

        let permissions = match &data.permissions {
            Some(slugs) => Some(
                PermissionRepository::new(self.base.db().clone())
                    .resolve_slugs(slugs)
                    .await?,
            ),
            None => None,
        };

        let patch = RolePatch {
            name: data.name,
            slug: data.slug,
            description: data.description,
            level: data.level,
            permissions,
            is_active: data.is_active,
        };

        let updated: Option<Role> = self.base.db().update(record).merge(patch).await?;
        updated.ok_or_else(|| RepoError::RoleNotFound(format!("Role {} not found", id)))?;

        self.find_detail(id)
            .await?
            .ok_or_else(|| RepoError::RoleNotFound(format!("Role {} not found", id)))
    }

    /// Replace a role's permission set (system roles included - the set is
    /// the one thing system roles may change)
    pub async fn assign_permissions(&self, id: &str, slugs: &[String]) -> RepoResult<RoleDetail> {
        self.update(
            id,
            RoleUpdate {
                permissions: Some(slugs.to_vec()),
                ..Default::default()
            },
        )
        .await
    }

    /// Delete a role. Rejected unconditionally for system roles, and for any
    /// role still assigned to users (the error carries the count).
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::RoleNotFound(format!("Role {} not found", id)))?;

        if existing.is_system {
            return Err(RepoError::Business(
                "Cannot delete system role".to_string(),
            ));
        }

        let referencing = UserRepository::new(self.base.db().clone())
            .count_by_role(&record)
            .await?;
        if referencing > 0 {
            return Err(RepoError::Business(format!(
                "Cannot delete role. It is assigned to {} user(s).",
                referencing
            )));
        }

        let _: Option<Role> = self.base.db().delete(record).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::catalog::{PERMISSION_CATALOG, ROLE_STORE_MANAGER, ROLE_SUPER_ADMIN};
    use crate::db::models::UserCreate;
    use crate::db::{DbService, seed};

    async fn test_db() -> Surreal<Db> {
        let db = DbService::open_in_memory().await.expect("db");
        seed::ensure_seed_data(&db).await.expect("seed");
        db
    }

    fn sample_role() -> RoleCreate {
        RoleCreate {
            name: "Support Agent".to_string(),
            slug: "support-agent".to_string(),
            description: "Handles support tickets".to_string(),
            level: 4,
            permissions: vec!["orders.read".to_string(), "users.read".to_string()],
        }
    }

    #[tokio::test]
    async fn test_system_roles_seeded_with_permissions() {
        let repo = RoleRepository::new(test_db().await);
        let roles = repo.find_all().await.expect("find_all");

        assert_eq!(roles.len(), 3);
        // Ordered by level: super-admin first
        assert_eq!(roles[0].slug, ROLE_SUPER_ADMIN);
        assert!(roles.iter().all(|r| r.is_system));

        let super_admin = &roles[0];
        assert_eq!(super_admin.permissions.len(), PERMISSION_CATALOG.len());

        let manager = roles.iter().find(|r| r.slug == ROLE_STORE_MANAGER).unwrap();
        assert!(manager.permissions.iter().any(|p| p.slug == "orders.read"));
        assert!(!manager.permissions.iter().any(|p| p.slug == "users.delete"));
    }

    #[tokio::test]
    async fn test_create_resolves_permission_slugs() {
        let repo = RoleRepository::new(test_db().await);
        let role = repo.create(sample_role()).await.expect("create");

        assert_eq!(role.level, 4);
        assert!(!role.is_system);
        assert_eq!(role.permissions.len(), 2);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_permission() {
        let repo = RoleRepository::new(test_db().await);
        let mut data = sample_role();
        data.permissions.push("orders.teleport".to_string());

        let err = repo.create(data).await.unwrap_err();
        assert!(matches!(err, RepoError::PermissionNotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let repo = RoleRepository::new(test_db().await);
        repo.create(sample_role()).await.expect("create");

        let err = repo.create(sample_role()).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_system_role_identity_locked() {
        let repo = RoleRepository::new(test_db().await);
        let manager = repo
            .find_by_slug(ROLE_STORE_MANAGER)
            .await
            .expect("find")
            .expect("some");
        let id = manager.id.expect("id").to_string();

        let err = repo
            .update(
                &id,
                RoleUpdate {
                    level: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Business(_)));

        // The permission set is still mutable
        let updated = repo
            .assign_permissions(&id, &["orders.read".to_string()])
            .await
            .expect("assign");
        assert_eq!(updated.permissions.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_system_role_rejected() {
        let repo = RoleRepository::new(test_db().await);
        let customer = repo
            .find_by_slug("customer")
            .await
            .expect("find")
            .expect("some");
        let id = customer.id.expect("id").to_string();

        let err = repo.delete(&id).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(_)));
    }

    #[tokio::test]
    async fn test_delete_referenced_role_carries_count() {
        let db = test_db().await;
        let repo = RoleRepository::new(db.clone());
        let role = repo.create(sample_role()).await.expect("create");
        let id = role.id.expect("id").to_string();

        UserRepository::new(db)
            .create(UserCreate {
                name: "Agent".to_string(),
                email: "agent@example.com".to_string(),
                password: "a-strong-password".to_string(),
                role: Some("support-agent".to_string()),
                is_admin: false,
            })
            .await
            .expect("user");

        let err = repo.delete(&id).await.unwrap_err();
        match err {
            RepoError::Business(msg) => assert!(msg.contains("1 user(s)")),
            other => panic!("expected Business, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_unreferenced_custom_role() {
        let repo = RoleRepository::new(test_db().await);
        let role = repo.create(sample_role()).await.expect("create");
        let id = role.id.expect("id").to_string();

        assert!(repo.delete(&id).await.expect("delete"));
        assert!(repo.find_by_id(&id).await.expect("find").is_none());
    }
}
