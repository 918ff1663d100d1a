//! User Admin API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

/// User management router - every operation carries its own permission
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/admin/users", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("users.read")));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission("users.create")));

    let update_routes = Router::new()
        .route("/{id}", put(handler::update))
        .route("/{id}/reset-lock", put(handler::reset_lock))
        .layer(middleware::from_fn(require_permission("users.update")));

    let block_routes = Router::new()
        .route("/{id}/block", put(handler::block))
        .route("/{id}/unblock", put(handler::unblock))
        .layer(middleware::from_fn(require_permission("users.block")));

    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("users.delete")));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(block_routes)
        .merge(delete_routes)
        .layer(middleware::from_fn(require_admin))
}
