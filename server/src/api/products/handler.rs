//! Product API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductPage, ProductQuery, ProductUpdate};
use crate::db::repository::ProductRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/products - paged storefront listing
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductQuery>,
) -> AppResult<Json<ProductPage>> {
    let repo = ProductRepository::new(state.get_db());
    Ok(Json(repo.find_page(query).await?))
}

/// GET /api/products/featured
pub async fn featured(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    Ok(Json(repo.find_featured().await?))
}

/// GET /api/products/new-arrivals
pub async fn new_arrivals(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    Ok(Json(repo.find_new_arrivals().await?))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    tracing::info!(user_id = %identity.id, name = %payload.name, "Creating product");

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;

    let id = product.id.as_ref().map(|i| i.to_string());
    state.activity.record(
        &identity,
        "product.created",
        "product",
        id,
        serde_json::json!({ "name": product.name }),
        None,
    );

    Ok(Json(product))
}

/// PUT /api/products/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    tracing::info!(user_id = %identity.id, product_id = %id, "Updating product");

    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await?;

    state.activity.record(
        &identity,
        "product.updated",
        "product",
        Some(id),
        serde_json::json!({ "name": product.name }),
        None,
    );

    Ok(Json(product))
}

/// DELETE /api/products/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    tracing::info!(user_id = %identity.id, product_id = %id, "Deleting product");

    let repo = ProductRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    if result {
        state.activity.record(
            &identity,
            "product.deleted",
            "product",
            Some(id),
            serde_json::json!({}),
            None,
        );
    }

    Ok(Json(result))
}
