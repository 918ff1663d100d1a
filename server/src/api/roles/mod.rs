//! Role Admin API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

/// Role and permission management router
pub fn router() -> Router<ServerState> {
    let role_routes = Router::new()
        .nest("/api/admin/roles", roles())
        .route("/api/admin/permissions", get(handler::list_permissions))
        .route(
            "/api/admin/permissions/categories",
            get(handler::permissions_by_category),
        )
        .layer(middleware::from_fn(require_permission(
            "settings.roles.manage",
        )));

    // Activation toggling is the one permission-catalog mutation
    let permission_routes = Router::new()
        .route(
            "/api/admin/permissions/{slug}/activate",
            put(handler::activate_permission),
        )
        .route(
            "/api/admin/permissions/{slug}/deactivate",
            put(handler::deactivate_permission),
        )
        .layer(middleware::from_fn(require_permission(
            "settings.permissions.manage",
        )));

    role_routes
        .merge(permission_routes)
        .layer(middleware::from_fn(require_admin))
}

fn roles() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/permissions", put(handler::assign_permissions))
}
