//! Store API Handlers

use axum::{Extension, Json, extract::State};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::models::{StoreProfile, StoreSettings, StoreSettingsUpdate};
use crate::db::repository::StoreSettingsRepository;
use crate::utils::AppResult;

/// GET /api/store/profile - public storefront subset
pub async fn profile(State(state): State<ServerState>) -> AppResult<Json<StoreProfile>> {
    let settings = StoreSettingsRepository::new(state.get_db()).get().await?;
    Ok(Json(StoreProfile::from(settings)))
}

/// GET /api/admin/store/settings
pub async fn get_settings(State(state): State<ServerState>) -> AppResult<Json<StoreSettings>> {
    let settings = StoreSettingsRepository::new(state.get_db()).get().await?;
    Ok(Json(settings))
}

/// PUT /api/admin/store/settings
pub async fn update_settings(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<StoreSettingsUpdate>,
) -> AppResult<Json<StoreSettings>> {
    tracing::info!(user_id = %identity.id, "Updating store settings");

    let repo = StoreSettingsRepository::new(state.get_db());
    let settings = repo.update(payload).await?;

    state.activity.record(
        &identity,
        "store.settings.updated",
        "store",
        None,
        serde_json::json!({ "store_name": settings.store_name }),
        None,
    );

    Ok(Json(settings))
}
