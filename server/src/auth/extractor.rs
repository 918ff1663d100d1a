//! Identity extractor
//!
//! Lets protected handlers take `identity: Identity` as an argument. Reuses
//! the identity injected by [`require_auth`](crate::auth::require_auth) when
//! present, otherwise runs the session gate itself.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::evaluator::Identity;
use crate::auth::gate;
use crate::auth::jwt::JwtService;
use crate::auth::middleware::client_ip;
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already authenticated by the middleware
        if let Some(identity) = parts.extensions.get::<Identity>() {
            return Ok(identity.clone());
        }

        let token = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(JwtService::extract_from_header);

        let ip = client_ip(&parts.headers);
        let identity = gate::authenticate(state, token, ip).await?;

        // Store for potential reuse within the same request
        parts.extensions.insert(identity.clone());

        Ok(identity)
    }
}
