//! Certification API Handlers

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::models::{Certification, CertificationCreate, CertificationUpdate};
use crate::db::repository::CertificationRepository;
use crate::utils::{AppError, AppResult};

/// GET /api/certifications
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Certification>>> {
    let repo = CertificationRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

/// GET /api/certifications/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Certification>> {
    let repo = CertificationRepository::new(state.get_db());
    let certification = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Certification {} not found", id)))?;
    Ok(Json(certification))
}

/// POST /api/certifications
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<CertificationCreate>,
) -> AppResult<Json<Certification>> {
    tracing::info!(user_id = %identity.id, name = %payload.name, "Creating certification");

    let repo = CertificationRepository::new(state.get_db());
    let certification = repo.create(payload).await?;

    state.activity.record(
        &identity,
        "certification.created",
        "certification",
        certification.id.as_ref().map(|i| i.to_string()),
        serde_json::json!({ "name": certification.name }),
        None,
    );

    Ok(Json(certification))
}

/// PUT /api/certifications/{id}
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
    Json(payload): Json<CertificationUpdate>,
) -> AppResult<Json<Certification>> {
    let repo = CertificationRepository::new(state.get_db());
    let certification = repo.update(&id, payload).await?;

    state.activity.record(
        &identity,
        "certification.updated",
        "certification",
        Some(id),
        serde_json::json!({ "name": certification.name }),
        None,
    );

    Ok(Json(certification))
}

/// DELETE /api/certifications/{id}
pub async fn delete(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = CertificationRepository::new(state.get_db());
    let result = repo.delete(&id).await?;

    if result {
        state.activity.record(
            &identity,
            "certification.deleted",
            "certification",
            Some(id),
            serde_json::json!({}),
            None,
        );
    }

    Ok(Json(result))
}
