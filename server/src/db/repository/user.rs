//! User Repository
//!
//! Account CRUD plus the failed-login bookkeeping backing the account-lock
//! state machine: Unlocked -> (5th consecutive failure) -> Locked(until) ->
//! (expiry passes) -> Unlocked. Locks are always time-bounded.

use super::{BaseRepository, PermissionRepository, RepoError, RepoResult};
use crate::auth::catalog::ROLE_CUSTOMER;
use crate::db::models::{
    LOCK_DURATION_MS, MAX_LOGIN_ATTEMPTS, PermissionId, Role, RoleId, User, UserCreate,
    UserHydrated, UserId, UserPage, UserQuery, UserUpdate,
};
use crate::utils::time::now_millis;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";
const PAGE_SIZE: usize = 20;

#[derive(Deserialize)]
struct CountRow {
    total: usize,
}

/// Partial update document, merged into the record.
/// Record ids serialize natively here so they land as links, not strings.
#[derive(Debug, Default, Serialize)]
struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<Vec<PermissionId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_admin: Option<bool>,
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id (references unresolved)
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let record = self.base.parse_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(record).await?;
        Ok(user)
    }

    /// Find user by id with role, role permissions and direct permissions
    /// fully materialized. This is the session gate's load path.
    pub async fn find_hydrated(&self, id: &str) -> RepoResult<Option<UserHydrated>> {
        let record = self.base.parse_id(TABLE, id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM $user FETCH role, permissions, role.permissions")
            .bind(("user", record))
            .await?;
        let users: Vec<UserHydrated> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let email = email.to_lowercase();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Paged admin listing with role / status / keyword filters
    pub async fn find_page(&self, query: UserQuery) -> RepoResult<UserPage> {
        let mut conditions: Vec<&str> = vec![];

        let role_id = match &query.role {
            Some(slug) => {
                let role = self
                    .find_role_by_slug(slug)
                    .await?
                    .ok_or_else(|| RepoError::RoleNotFound(format!("Role '{}' not found", slug)))?;
                conditions.push("role = $role");
                role.id
            }
            None => None,
        };
        if query.is_active.is_some() {
            conditions.push("is_active = $is_active");
        }
        if query.keyword.is_some() {
            conditions.push(
                "(string::lowercase(name) CONTAINS $keyword OR string::lowercase(email) CONTAINS $keyword)",
            );
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let page = query.page.unwrap_or(1).max(1);
        let select = format!(
            "SELECT * FROM user{} ORDER BY created_at DESC LIMIT $limit START $start FETCH role, permissions, role.permissions",
            where_clause
        );
        let count = format!("SELECT count() AS total FROM user{} GROUP ALL", where_clause);

        let mut result = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("role", role_id))
            .bind(("is_active", query.is_active))
            .bind(("keyword", query.keyword.map(|k| k.to_lowercase())))
            .bind(("limit", PAGE_SIZE))
            .bind(("start", PAGE_SIZE * (page - 1)))
            .await?;

        let users: Vec<UserHydrated> = result.take(0)?;
        let total = result
            .take::<Vec<CountRow>>(1)?
            .into_iter()
            .next()
            .map(|r| r.total)
            .unwrap_or(0);

        Ok(UserPage {
            users,
            page,
            pages: total.div_ceil(PAGE_SIZE),
            total,
        })
    }

    /// Create a new user. The role is given as a slug and defaults to the
    /// customer role.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = data.email.to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User with email '{}' already exists",
                email
            )));
        }

        let role_slug = data.role.as_deref().unwrap_or(ROLE_CUSTOMER);
        let role = self
            .find_role_by_slug(role_slug)
            .await?
            .ok_or_else(|| RepoError::RoleNotFound(format!("Role '{}' not found", role_slug)))?;

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    email = $email,
                    password_hash = $password_hash,
                    is_admin = $is_admin,
                    role = $role,
                    permissions = [],
                    is_active = true,
                    login_attempts = 0,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("email", email))
            .bind(("password_hash", password_hash))
            .bind(("is_admin", data.is_admin))
            .bind(("role", role.id))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user. Role arrives as a slug, direct permissions as catalog
    /// slugs; both are resolved to references before the merge.
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<UserHydrated> {
        let record = self.base.parse_id(TABLE, id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if let Some(ref new_email) = data.email {
            let new_email = new_email.to_lowercase();
            if new_email != existing.email && self.find_by_email(&new_email).await?.is_some() {
                return Err(RepoError::Duplicate(format!(
                    "User with email '{}' already exists",
                    new_email
                )));
            }
        }

        let role = match &data.role {
            Some(slug) => {
                let role = self
                    .find_role_by_slug(slug)
                    .await?
                    .ok_or_else(|| RepoError::RoleNotFound(format!("Role '{}' not found", slug)))?;
                role.id
            }
            None => None,
        };

        let permissions = match &data.permissions {
            Some(slugs) => {
                let perms = PermissionRepository::new(self.base.db().clone())
                    .resolve_slugs(slugs)
                    .await?;
                Some(perms)
            }
            None => None,
        };

        let password_hash = match &data.password {
            Some(password) => Some(
                User::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let patch = UserPatch {
            name: data.name,
            email: data.email.map(|e| e.to_lowercase()),
            password_hash,
            role,
            permissions,
            is_active: data.is_active,
            is_admin: data.is_admin,
        };

        let updated: Option<User> = self.base.db().update(record).merge(patch).await?;
        updated.ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        self.find_hydrated(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let record = self.base.parse_id(TABLE, id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        let _: Option<User> = self.base.db().delete(record).await?;
        Ok(true)
    }

    /// Number of users referencing a role; guards role deletion
    pub async fn count_by_role(&self, role: &RoleId) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS total FROM user WHERE role = $role GROUP ALL")
            .bind(("role", role.clone()))
            .await?;
        let total = result
            .take::<Vec<CountRow>>(0)?
            .into_iter()
            .next()
            .map(|r| r.total)
            .unwrap_or(0);
        Ok(total)
    }

    /// Record a failed password attempt.
    ///
    /// If a previous lock has already expired the counter restarts at 1;
    /// otherwise it increments, and the attempt that reaches the limit sets
    /// a lock expiry two hours out.
    pub async fn record_failed_login(&self, id: &str) -> RepoResult<User> {
        let record = self.base.parse_id(TABLE, id)?;
        let user = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        let now = now_millis();
        let (attempts, lock_until) = match user.lock_until {
            // Expired lock: restart the count, clear the lock
            Some(until) if until <= now => (1, None),
            _ => {
                let attempts = user.login_attempts + 1;
                let lock_until = if attempts >= MAX_LOGIN_ATTEMPTS && !user.is_locked(now) {
                    Some(now + LOCK_DURATION_MS)
                } else {
                    user.lock_until
                };
                (attempts, lock_until)
            }
        };

        let mut result = self
            .base
            .db()
            .query("UPDATE $user SET login_attempts = $attempts, lock_until = $lock_until RETURN AFTER")
            .bind(("user", record))
            .bind(("attempts", attempts))
            .bind(("lock_until", lock_until))
            .await?;

        result
            .take::<Vec<User>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Clear the failed-login counter and any lock (successful login or
    /// explicit admin reset)
    pub async fn reset_login_attempts(&self, id: &str) -> RepoResult<()> {
        let record = self.base.parse_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $user SET login_attempts = 0, lock_until = NONE")
            .bind(("user", record))
            .await?;
        Ok(())
    }

    /// Record last-seen timestamp and network origin
    pub async fn touch_last_seen(&self, id: &UserId, ip: Option<String>) -> RepoResult<()> {
        self.base
            .db()
            .query("UPDATE $user SET last_login = $now, last_login_ip = $ip")
            .bind(("user", id.clone()))
            .bind(("now", now_millis()))
            .bind(("ip", ip))
            .await?;
        Ok(())
    }

    async fn find_role_by_slug(&self, slug: &str) -> RepoResult<Option<Role>> {
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbService, seed};

    async fn test_repo() -> UserRepository {
        let db = DbService::open_in_memory().await.expect("db");
        seed::ensure_seed_data(&db).await.expect("seed");
        UserRepository::new(db)
    }

    async fn create_customer(repo: &UserRepository) -> String {
        let user = repo
            .create(UserCreate {
                name: "Casey".to_string(),
                email: "casey@example.com".to_string(),
                password: "a-strong-password".to_string(),
                role: None,
                is_admin: false,
            })
            .await
            .expect("create");
        user.id.expect("id").to_string()
    }

    #[tokio::test]
    async fn test_create_defaults_to_customer_role() {
        let repo = test_repo().await;
        let id = create_customer(&repo).await;

        let hydrated = repo.find_hydrated(&id).await.expect("find").expect("some");
        assert_eq!(hydrated.role.expect("role").slug, "customer");
        assert_eq!(hydrated.login_attempts, 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = test_repo().await;
        create_customer(&repo).await;

        let err = repo
            .create(UserCreate {
                name: "Casey Two".to_string(),
                email: "CASEY@example.com".to_string(),
                password: "another-password".to_string(),
                role: None,
                is_admin: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_unknown_role_rejected() {
        let repo = test_repo().await;
        let err = repo
            .create(UserCreate {
                name: "Robin".to_string(),
                email: "robin@example.com".to_string(),
                password: "a-strong-password".to_string(),
                role: Some("warehouse-bot".to_string()),
                is_admin: false,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::RoleNotFound(_)));
    }

    #[tokio::test]
    async fn test_fifth_failure_locks_for_two_hours() {
        let repo = test_repo().await;
        let id = create_customer(&repo).await;

        for expected in 1..=4u32 {
            let user = repo.record_failed_login(&id).await.expect("failure");
            assert_eq!(user.login_attempts, expected);
            assert!(user.lock_until.is_none());
        }

        let before = now_millis();
        let user = repo.record_failed_login(&id).await.expect("failure");
        assert_eq!(user.login_attempts, 5);
        let until = user.lock_until.expect("locked");
        assert!(until >= before + LOCK_DURATION_MS - 1_000);
        assert!(until <= now_millis() + LOCK_DURATION_MS + 1_000);
        assert!(user.is_locked(now_millis()));
    }

    #[tokio::test]
    async fn test_expired_lock_restarts_counter_at_one() {
        let repo = test_repo().await;
        let id = create_customer(&repo).await;

        // Simulate an already-expired lock with a saturated counter
        let record = repo.base.parse_id(TABLE, &id).expect("id");
        repo.base
            .db()
            .query("UPDATE $user SET login_attempts = 5, lock_until = $until")
            .bind(("user", record))
            .bind(("until", now_millis() - 1_000))
            .await
            .expect("setup");

        let user = repo.record_failed_login(&id).await.expect("failure");
        assert_eq!(user.login_attempts, 1);
        assert!(user.lock_until.is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_counter_and_lock() {
        let repo = test_repo().await;
        let id = create_customer(&repo).await;

        for _ in 0..5 {
            repo.record_failed_login(&id).await.expect("failure");
        }
        repo.reset_login_attempts(&id).await.expect("reset");

        let user = repo.find_by_id(&id).await.expect("find").expect("some");
        assert_eq!(user.login_attempts, 0);
        assert!(user.lock_until.is_none());
    }

    #[tokio::test]
    async fn test_direct_permission_assignment() {
        let repo = test_repo().await;
        let id = create_customer(&repo).await;

        let hydrated = repo
            .update(
                &id,
                UserUpdate {
                    permissions: Some(vec!["orders.refund".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(hydrated.permissions.len(), 1);
        assert_eq!(hydrated.permissions[0].slug, "orders.refund");
    }

    #[tokio::test]
    async fn test_unknown_direct_permission_rejected() {
        let repo = test_repo().await;
        let id = create_customer(&repo).await;

        let err = repo
            .update(
                &id,
                UserUpdate {
                    permissions: Some(vec!["orders.teleport".to_string()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::PermissionNotFound(_)));
    }
}
