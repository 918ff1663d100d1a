//! Product API Module

mod handler;

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::auth::require_permission;
use crate::core::ServerState;

/// Product router - storefront reads are public, writes are permission-gated
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/featured", get(handler::featured))
        .route("/new-arrivals", get(handler::new_arrivals))
        .route("/{id}", get(handler::get_by_id));

    let create_routes = Router::new()
        .route("/", post(handler::create))
        .layer(middleware::from_fn(require_permission("products.create")));

    let update_routes = Router::new()
        .route("/{id}", put(handler::update))
        .layer(middleware::from_fn(require_permission("products.update")));

    let delete_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .layer(middleware::from_fn(require_permission("products.delete")));

    read_routes
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
}
