//! Order API Module
//!
//! Storefront checkout under `/api/orders` (any authenticated user, with
//! ownership checks on reads) and the admin console under
//! `/api/admin/orders` (permission-gated).

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{require_admin, require_permission};
use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/orders", storefront_routes())
        .nest("/api/admin/orders", admin_routes())
}

fn storefront_routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::place_order))
        .route("/mine", get(handler::my_orders))
        .route("/{id}", get(handler::get_own))
}

fn admin_routes() -> Router<ServerState> {
    let read_routes = Router::new()
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id))
        .layer(middleware::from_fn(require_permission("orders.read")));

    let update_routes = Router::new()
        .route("/{id}/pay", put(handler::mark_paid))
        .route("/{id}/deliver", put(handler::mark_delivered))
        .layer(middleware::from_fn(require_permission("orders.update")));

    let refund_routes = Router::new()
        .route("/{id}/refund", put(handler::refund))
        .layer(middleware::from_fn(require_permission("orders.refund")));

    read_routes
        .merge(update_routes)
        .merge(refund_routes)
        .layer(middleware::from_fn(require_admin))
}
