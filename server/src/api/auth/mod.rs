//! Auth API Module

pub mod handler;

use axum::{Router, routing::{get, post}};

use crate::core::ServerState;

/// Auth router - login/register are public, me/logout need a session
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/register", post(handler::register))
        .route("/me", get(handler::me))
        .route("/logout", post(handler::logout))
}
