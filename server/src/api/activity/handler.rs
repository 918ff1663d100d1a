//! Activity Log API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::core::ServerState;
use crate::db::models::ActivityQuery;
use crate::db::repository::ActivityLogRepository;
use crate::db::repository::activity_log::ActivityPage;
use crate::utils::AppResult;

/// GET /api/admin/activity - newest first, optional action/target filters
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ActivityQuery>,
) -> AppResult<Json<ActivityPage>> {
    let repo = ActivityLogRepository::new(state.get_db());
    Ok(Json(repo.find_page(query).await?))
}
