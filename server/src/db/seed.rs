//! Seed routine
//!
//! Runs once inside `ServerState::initialize`, before the server accepts
//! requests: materializes the permission catalog, the three system roles,
//! the store-settings singleton and a bootstrap super-admin account.
//! Idempotent - existing records are left untouched.

use crate::auth::catalog::{
    PERMISSION_CATALOG, ROLE_SUPER_ADMIN, SYSTEM_ROLES, default_role_permissions,
};
use crate::auth::jwt::generate_printable_secret;
use crate::db::models::UserCreate;
use crate::db::repository::{
    PermissionRepository, RepoResult, RoleRepository, StoreSettingsRepository, UserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

/// Seed everything the server needs to authorize its first request
pub async fn ensure_seed_data(db: &Surreal<Db>) -> RepoResult<()> {
    seed_permissions(db).await?;
    seed_roles(db).await?;
    StoreSettingsRepository::new(db.clone()).init_defaults().await?;
    seed_admin_user(db).await?;
    Ok(())
}

async fn seed_permissions(db: &Surreal<Db>) -> RepoResult<()> {
    let repo = PermissionRepository::new(db.clone());
    let mut created = 0usize;

    for def in PERMISSION_CATALOG {
        if repo.find_by_slug(def.slug).await?.is_some() {
            continue;
        }
        db.query(
            r#"CREATE permission SET
                name = $name,
                slug = $slug,
                category = $category,
                resource = $resource,
                action = $action,
                is_active = true"#,
        )
        .bind(("name", def.name))
        .bind(("slug", def.slug))
        .bind(("category", def.category))
        .bind(("resource", def.resource))
        .bind(("action", def.action))
        .await?;
        created += 1;
    }

    if created > 0 {
        tracing::info!(created, "Seeded permission catalog");
    }
    Ok(())
}

async fn seed_roles(db: &Surreal<Db>) -> RepoResult<()> {
    let role_repo = RoleRepository::new(db.clone());
    let perm_repo = PermissionRepository::new(db.clone());

    for def in SYSTEM_ROLES {
        if role_repo.find_by_slug(def.slug).await?.is_some() {
            continue;
        }

        let permissions = perm_repo
            .resolve_slugs(&default_role_permissions(def.slug))
            .await?;

        db.query(
            r#"CREATE role SET
                name = $name,
                slug = $slug,
                description = $description,
                level = $level,
                permissions = $permissions,
                is_system = true,
                is_active = true"#,
        )
        .bind(("name", def.name))
        .bind(("slug", def.slug))
        .bind(("description", def.description))
        .bind(("level", def.level))
        .bind(("permissions", permissions))
        .await?;

        tracing::info!(role = def.slug, level = def.level, "Seeded system role");
    }

    Ok(())
}

/// Create the bootstrap super-admin when no user holds the role yet.
/// Credentials come from ADMIN_EMAIL / ADMIN_PASSWORD; without a configured
/// password a random one is generated and printed once to the log.
async fn seed_admin_user(db: &Surreal<Db>) -> RepoResult<()> {
    let role_repo = RoleRepository::new(db.clone());
    let user_repo = UserRepository::new(db.clone());

    let super_admin = match role_repo.find_by_slug(ROLE_SUPER_ADMIN).await? {
        Some(role) => role,
        None => return Ok(()),
    };
    let role_id = match super_admin.id {
        Some(id) => id,
        None => return Ok(()),
    };

    if user_repo.count_by_role(&role_id).await? > 0 {
        return Ok(());
    }

    let email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@verdant.example".to_string());
    let (password, generated) = match std::env::var("ADMIN_PASSWORD") {
        Ok(p) => (p, false),
        Err(_) => {
            let mut p = generate_printable_secret();
            p.truncate(16);
            (p, true)
        }
    };

    user_repo
        .create(UserCreate {
            name: "Administrator".to_string(),
            email: email.clone(),
            password: password.clone(),
            role: Some(ROLE_SUPER_ADMIN.to_string()),
            is_admin: true,
        })
        .await?;

    if generated {
        tracing::warn!(
            email = %email,
            password = %password,
            "Created bootstrap admin with a generated password - change it immediately"
        );
    } else {
        tracing::info!(email = %email, "Created bootstrap admin account");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use crate::db::models::Permission;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = DbService::open_in_memory().await.expect("db");
        ensure_seed_data(&db).await.expect("first run");
        ensure_seed_data(&db).await.expect("second run");

        let permissions: Vec<Permission> = db
            .query("SELECT * FROM permission")
            .await
            .expect("query")
            .take(0)
            .expect("take");
        assert_eq!(permissions.len(), PERMISSION_CATALOG.len());

        let roles = RoleRepository::new(db.clone()).find_all().await.expect("roles");
        assert_eq!(roles.len(), SYSTEM_ROLES.len());
    }

    #[tokio::test]
    async fn test_bootstrap_admin_created_once() {
        let db = DbService::open_in_memory().await.expect("db");
        ensure_seed_data(&db).await.expect("seed");
        ensure_seed_data(&db).await.expect("seed again");

        let repo = UserRepository::new(db.clone());
        let role = RoleRepository::new(db)
            .find_by_slug(ROLE_SUPER_ADMIN)
            .await
            .expect("find")
            .expect("some");
        let count = repo.count_by_role(&role.id.expect("id")).await.expect("count");
        assert_eq!(count, 1);
    }
}
