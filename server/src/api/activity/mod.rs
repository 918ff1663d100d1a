//! Activity Log API Module

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

/// Activity log router - read-only, permission-gated
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/admin/activity", get(handler::list))
        .layer(middleware::from_fn(require_permission(
            "settings.activity.read",
        )))
        .layer(middleware::from_fn(require_admin))
}
