//! Role Admin API Handlers

use std::collections::BTreeMap;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::auth::Identity;
use crate::auth::catalog::is_valid_permission;
use crate::core::ServerState;
use crate::db::models::{Permission, RoleCreate, RoleDetail, RoleUpdate};
use crate::db::repository::{PermissionRepository, RoleRepository};
use crate::utils::{AppError, AppResult};

/// Operators may only hand out permissions they hold themselves, and only
/// ones the catalog knows about
fn validate_permission_ceiling(identity: &Identity, slugs: &[String]) -> AppResult<()> {
    for slug in slugs {
        if !is_valid_permission(slug) {
            return Err(AppError::Invalid(format!("Invalid permission: {}", slug)));
        }
        if !identity.has_permission(slug) {
            return Err(AppError::Forbidden(format!(
                "Cannot grant permission '{}': you do not have it yourself",
                slug
            )));
        }
    }
    Ok(())
}

/// GET /api/admin/roles
pub async fn list(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<RoleDetail>>> {
    tracing::info!(user_id = %identity.id, "Fetching roles");

    let repo = RoleRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/admin/roles/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<RoleDetail>> {
    let repo = RoleRepository::new(state.get_db());
    let role = repo
        .find_detail(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Role {} not found", id)))?;
    Ok(Json(role))
}

/// POST /api/admin/roles
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<Json<RoleDetail>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    validate_permission_ceiling(&identity, &payload.permissions)?;

    tracing::info!(
        user_id = %identity.id,
        role_slug = %payload.slug,
        level = payload.level,
        "Creating role"
    );

    let repo = RoleRepository::new(state.get_db());
    let role = repo.create(payload).await?;

    state.activity.record(
        &identity,
        "role.created",
        "role",
        role.id.as_ref().map(|i| i.to_string()),
        serde_json::json!({ "slug": role.slug }),
        None,
    );

    Ok(Json(role))
}

/// PUT /api/admin/roles/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<RoleDetail>> {
    if let Some(ref slugs) = payload.permissions {
        validate_permission_ceiling(&identity, slugs)?;
    }

    tracing::info!(user_id = %identity.id, role_id = %id, "Updating role");

    let repo = RoleRepository::new(state.get_db());
    let role = repo.update(&id, payload).await?;

    state.activity.record(
        &identity,
        "role.updated",
        "role",
        Some(id),
        serde_json::json!({ "slug": role.slug }),
        None,
    );

    Ok(Json(role))
}

/// PUT /api/admin/roles/{id}/permissions - replace the permission set
pub async fn assign_permissions(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(slugs): Json<Vec<String>>,
) -> AppResult<Json<RoleDetail>> {
    validate_permission_ceiling(&identity, &slugs)?;

    tracing::info!(
        user_id = %identity.id,
        role_id = %id,
        permissions = ?slugs,
        "Updating role permissions"
    );

    let repo = RoleRepository::new(state.get_db());
    let role = repo.assign_permissions(&id, &slugs).await?;

    state.activity.record(
        &identity,
        "role.permissions.updated",
        "role",
        Some(id),
        serde_json::json!({ "slug": role.slug, "count": slugs.len() }),
        None,
    );

    Ok(Json(role))
}

/// DELETE /api/admin/roles/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = %identity.id, role_id = %id, "Deleting role");

    let repo = RoleRepository::new(state.get_db());
    let name_for_log = repo
        .find_by_id(&id)
        .await
        .ok()
        .flatten()
        .map(|r| r.name)
        .unwrap_or_default();
    let result = repo.delete(&id).await?;

    if result {
        state.activity.record(
            &identity,
            "role.deleted",
            "role",
            Some(id),
            serde_json::json!({ "name": name_for_log }),
            None,
        );
    }

    Ok(Json(result))
}

/// GET /api/admin/permissions - the active catalog
pub async fn list_permissions(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<Permission>>> {
    let repo = PermissionRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/admin/permissions/categories - catalog grouped for the admin UI
pub async fn permissions_by_category(
    State(state): State<ServerState>,
) -> AppResult<Json<BTreeMap<String, Vec<Permission>>>> {
    let repo = PermissionRepository::new(state.get_db());
    let mut grouped: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
    for permission in repo.find_all().await? {
        grouped
            .entry(permission.category.clone())
            .or_default()
            .push(permission);
    }
    Ok(Json(grouped))
}

/// PUT /api/admin/permissions/{slug}/activate
pub async fn activate_permission(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(slug): Path<String>,
) -> AppResult<Json<Permission>> {
    toggle_permission(state, identity, slug, true).await
}

/// PUT /api/admin/permissions/{slug}/deactivate
pub async fn deactivate_permission(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(slug): Path<String>,
) -> AppResult<Json<Permission>> {
    toggle_permission(state, identity, slug, false).await
}

async fn toggle_permission(
    state: ServerState,
    identity: Identity,
    slug: String,
    is_active: bool,
) -> AppResult<Json<Permission>> {
    let repo = PermissionRepository::new(state.get_db());
    let permission = repo.set_active(&slug, is_active).await?;

    state.activity.record(
        &identity,
        if is_active {
            "permission.activated"
        } else {
            "permission.deactivated"
        },
        "permission",
        Some(slug),
        serde_json::json!({}),
        None,
    );

    Ok(Json(permission))
}
