//! Authentication middleware
//!
//! Axum middleware for session authentication and permission gating.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::evaluator::Identity;
use crate::auth::gate;
use crate::auth::jwt::JwtService;
use crate::core::ServerState;
use crate::security_log;
use crate::utils::AppError;

/// Routes reachable without a session
fn is_public_route(method: &http::Method, path: &str) -> bool {
    if method == http::Method::POST {
        return path == "/api/auth/login" || path == "/api/auth/register";
    }
    if method == http::Method::GET {
        return path == "/api/health"
            || path == "/api/store/profile"
            || path.starts_with("/api/products")
            || path.starts_with("/api/categories")
            || path.starts_with("/api/brands")
            || path.starts_with("/api/certifications");
    }
    false
}

/// Client network origin, as reported by the reverse proxy
pub(crate) fn client_ip(req_headers: &http::HeaderMap) -> Option<String> {
    req_headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Authentication middleware - requires a valid session
///
/// Extracts and verifies the `Authorization: Bearer <token>` header, loads
/// the caller's identity through the session gate, and injects it into the
/// request extensions for handlers and permission middleware downstream.
///
/// # Skipped paths
///
/// - `OPTIONS *` (CORS preflight)
/// - non-`/api/` paths
/// - the public storefront routes (login, register, health, catalog reads)
///
/// # Errors
///
/// | Failure | HTTP status |
/// |---------|-------------|
/// | missing/invalid/expired token | 401 |
/// | account inactive | 403 |
/// | account locked | 423 |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Allow CORS preflight through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    // Non-API routes fall through to their own 404 handling
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }

    if is_public_route(req.method(), path) {
        return Ok(next.run(req).await);
    }

    let token = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header);

    if token.is_none() {
        security_log!("WARN", "auth_missing", uri = format!("{:?}", req.uri()));
    }

    let ip = client_ip(req.headers());
    match gate::authenticate(&state, token, ip).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(
                "WARN",
                "auth_failed",
                error = format!("{}", e),
                uri = format!("{:?}", req.uri())
            );
            Err(e.into())
        }
    }
}

/// Permission middleware - requires a specific permission slug
///
/// # Usage
///
/// ```ignore
/// use axum::middleware;
/// Router::new()
///     .route("/api/admin/users", get(handler::list))
///     .layer(middleware::from_fn(require_permission("users.read")));
/// ```
///
/// # Errors
///
/// 401 when no identity was attached, 403 when the permission is missing.
pub fn require_permission(
    permission: &'static str,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, AppError>> + Send>>
+ Clone {
    move |req: Request, next: Next| {
        Box::pin(async move {
            let identity = req
                .extensions()
                .get::<Identity>()
                .ok_or(AppError::Unauthorized)?;

            if !identity.has_permission(permission) {
                security_log!(
                    "WARN",
                    "permission_denied",
                    user_id = identity.id.to_string(),
                    email = identity.email.clone(),
                    required_permission = permission
                );
                return Err(AppError::Forbidden(format!(
                    "Access denied. Required permission: {}",
                    permission
                )));
            }

            Ok(next.run(req).await)
        })
    }
}

/// Admin middleware - requires the legacy admin flag or an admin-tier role
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let identity = req
        .extensions()
        .get::<Identity>()
        .ok_or(AppError::Unauthorized)?;

    if !identity.is_admin() {
        security_log!(
            "WARN",
            "admin_required",
            user_id = identity.id.to_string(),
            email = identity.email.clone()
        );
        return Err(AppError::Forbidden(
            "Not authorized as an admin".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

/// Extension trait for pulling the authenticated identity off a request
pub trait IdentityExt {
    /// Get the authenticated [`Identity`] from the request extensions
    ///
    /// # Errors
    ///
    /// 401 when the request never passed authentication.
    fn identity(&self) -> Result<&Identity, AppError>;
}

impl IdentityExt for Request {
    fn identity(&self) -> Result<&Identity, AppError> {
        self.extensions()
            .get::<Identity>()
            .ok_or(AppError::Unauthorized)
    }
}
