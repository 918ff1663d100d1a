//! User Admin API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use validator::Validate;

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserHydrated, UserPage, UserQuery, UserUpdate};
use crate::db::repository::UserRepository;
use crate::utils::{AppError, AppResult};

/// Operators may only grant permissions they hold themselves
fn validate_permission_ceiling(identity: &Identity, slugs: &[String]) -> AppResult<()> {
    for slug in slugs {
        if !identity.has_permission(slug) {
            return Err(AppError::Forbidden(format!(
                "Cannot grant permission '{}': you do not have it yourself",
                slug
            )));
        }
    }
    Ok(())
}

/// GET /api/admin/users - paged listing with role/status/keyword filters
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<UserQuery>,
) -> AppResult<Json<UserPage>> {
    let repo = UserRepository::new(state.get_db());
    Ok(Json(repo.find_page(query).await?))
}

/// GET /api/admin/users/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserHydrated>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .find_hydrated(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
    Ok(Json(user))
}

/// POST /api/admin/users
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserHydrated>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::info!(
        user_id = %identity.id,
        email = %payload.email,
        role = ?payload.role,
        "Creating user"
    );

    let repo = UserRepository::new(state.get_db());
    let user = repo.create(payload).await?;
    let id = user
        .id
        .as_ref()
        .map(|i| i.to_string())
        .ok_or_else(|| AppError::Internal("Created user has no id".to_string()))?;

    let hydrated = repo
        .find_hydrated(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    state.activity.record(
        &identity,
        "user.created",
        "user",
        Some(id),
        serde_json::json!({ "email": hydrated.email }),
        None,
    );

    Ok(Json(hydrated))
}

/// PUT /api/admin/users/{id}
///
/// Role reassignment and direct (role-override) permission grants both
/// land here; direct permissions are additive to the role's set.
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserHydrated>> {
    if let Some(ref slugs) = payload.permissions {
        validate_permission_ceiling(&identity, slugs)?;
    }

    tracing::info!(user_id = %identity.id, target = %id, "Updating user");

    let repo = UserRepository::new(state.get_db());
    let user = repo.update(&id, payload).await?;

    state.activity.record(
        &identity,
        "user.updated",
        "user",
        Some(id),
        serde_json::json!({ "email": user.email }),
        None,
    );

    Ok(Json(user))
}

/// PUT /api/admin/users/{id}/block
pub async fn block(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<UserHydrated>> {
    if identity.id.to_string() == id {
        return Err(AppError::BusinessRule(
            "Cannot block your own account".to_string(),
        ));
    }

    set_active(state, identity, id, false).await
}

/// PUT /api/admin/users/{id}/unblock
pub async fn unblock(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<UserHydrated>> {
    set_active(state, identity, id, true).await
}

async fn set_active(
    state: ServerState,
    identity: Identity,
    id: String,
    is_active: bool,
) -> AppResult<Json<UserHydrated>> {
    let repo = UserRepository::new(state.get_db());
    let user = repo
        .update(
            &id,
            UserUpdate {
                is_active: Some(is_active),
                ..Default::default()
            },
        )
        .await?;

    state.activity.record(
        &identity,
        if is_active { "user.unblocked" } else { "user.blocked" },
        "user",
        Some(id),
        serde_json::json!({ "email": user.email }),
        None,
    );

    Ok(Json(user))
}

/// PUT /api/admin/users/{id}/reset-lock - clear failed-login lockout
pub async fn reset_lock(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<UserHydrated>> {
    let repo = UserRepository::new(state.get_db());
    repo.find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
    repo.reset_login_attempts(&id).await?;

    let user = repo
        .find_hydrated(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    state.activity.record(
        &identity,
        "user.lock_reset",
        "user",
        Some(id),
        serde_json::json!({ "email": user.email }),
        None,
    );

    Ok(Json(user))
}

/// DELETE /api/admin/users/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    if identity.id.to_string() == id {
        return Err(AppError::BusinessRule(
            "Cannot delete your own account".to_string(),
        ));
    }

    tracing::info!(user_id = %identity.id, target = %id, "Deleting user");

    let repo = UserRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    if result {
        state.activity.record(
            &identity,
            "user.deleted",
            "user",
            Some(id),
            serde_json::json!({}),
            None,
        );
    }

    Ok(Json(result))
}
