//! Store API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

/// Store router - public profile plus permission-gated settings
pub fn router() -> Router<ServerState> {
    let public_routes = Router::new().route("/api/store/profile", get(handler::profile));

    let read_routes = Router::new()
        .route("/api/admin/store/settings", get(handler::get_settings))
        .layer(middleware::from_fn(require_permission(
            "store.settings.read",
        )));

    let update_routes = Router::new()
        .route("/api/admin/store/settings", put(handler::update_settings))
        .layer(middleware::from_fn(require_permission(
            "store.settings.update",
        )));

    let admin_routes = read_routes
        .merge(update_routes)
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(admin_routes)
}
