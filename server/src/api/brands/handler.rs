//! Brand API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::models::{Brand, BrandCreate, BrandUpdate};
use crate::db::repository::BrandRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/brands
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Brand>>> {
    let repo = BrandRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/brands/verified
pub async fn list_verified(State(state): State<ServerState>) -> AppResult<Json<Vec<Brand>>> {
    let repo = BrandRepository::new(state.get_db());
    Ok(Json(repo.find_verified().await?))
}

/// GET /api/brands/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Brand>> {
    let repo = BrandRepository::new(state.get_db());
    let brand = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Brand {} not found", id)))?;
    Ok(Json(brand))
}

/// POST /api/brands
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<BrandCreate>,
) -> AppResult<Json<Brand>> {
    tracing::info!(user_id = %identity.id, name = %payload.name, "Creating brand");

    let repo = BrandRepository::new(state.get_db());
    let brand = repo.create(payload).await?;

    state.activity.record(
        &identity,
        "brand.created",
        "brand",
        brand.id.as_ref().map(|i| i.to_string()),
        serde_json::json!({ "name": brand.name }),
        None,
    );

    Ok(Json(brand))
}

/// PUT /api/brands/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<BrandUpdate>,
) -> AppResult<Json<Brand>> {
    let repo = BrandRepository::new(state.get_db());
    let brand = repo.update(&id, payload).await?;

    state.activity.record(
        &identity,
        "brand.updated",
        "brand",
        Some(id),
        serde_json::json!({ "name": brand.name }),
        None,
    );

    Ok(Json(brand))
}

/// DELETE /api/brands/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = BrandRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    if result {
        state.activity.record(
            &identity,
            "brand.deleted",
            "brand",
            Some(id),
            serde_json::json!({}),
            None,
        );
    }

    Ok(Json(result))
}
