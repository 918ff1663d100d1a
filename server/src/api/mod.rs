//! API route modules
//!
//! # Structure
//!
//! - [`health`] - health check
//! - [`auth`] - login, registration, session info
//! - [`products`] / [`categories`] / [`brands`] / [`certifications`] - catalog
//! - [`orders`] - storefront checkout and admin order management
//! - [`users`] - admin user management
//! - [`roles`] - admin role and permission management
//! - [`store`] - store profile and settings
//! - [`activity`] - admin activity log
//!
//! Each module exposes `router()`; handlers live in the module's
//! `handler.rs`.

use axum::Router;
use axum::middleware as axum_middleware;
use http::{HeaderName, HeaderValue};
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::require_auth;
use crate::core::ServerState;

pub mod activity;
pub mod auth;
pub mod brands;
pub mod categories;
pub mod certifications;
pub mod health;
pub mod orders;
pub mod products;
pub mod roles;
pub mod store;
pub mod users;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(brands::router())
        .merge(certifications::router())
        .merge(orders::router())
        .merge(users::router())
        .merge(roles::router())
        .merge(store::router())
        .merge(activity::router())
}

/// Build the fully configured application with middleware stack
pub fn build_app(state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_millis(
            state.config.request_timeout_ms,
        )))
        // Request ID - generate and propagate a unique id per request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // ========== Application Middleware ==========
        // Session gate - runs before routes, injects Identity
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
}
