//! Category API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::models::{Category, CategoryCreate, CategoryUpdate};
use crate::db::repository::CategoryRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let repo = CategoryRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/categories/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;
    Ok(Json(category))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    tracing::info!(user_id = %identity.id, name = %payload.name, "Creating category");

    let repo = CategoryRepository::new(state.get_db());
    let category = repo.create(payload).await?;

    state.activity.record(
        &identity,
        "category.created",
        "category",
        category.id.as_ref().map(|i| i.to_string()),
        serde_json::json!({ "name": category.name }),
        None,
    );

    Ok(Json(category))
}

/// PUT /api/categories/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    let repo = CategoryRepository::new(state.get_db());
    let category = repo.update(&id, payload).await?;

    state.activity.record(
        &identity,
        "category.updated",
        "category",
        Some(id),
        serde_json::json!({ "name": category.name }),
        None,
    );

    Ok(Json(category))
}

/// DELETE /api/categories/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CategoryRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    if result {
        state.activity.record(
            &identity,
            "category.deleted",
            "category",
            Some(id),
            serde_json::json!({}),
            None,
        );
    }

    Ok(Json(result))
}
