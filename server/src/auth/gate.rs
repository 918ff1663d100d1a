//! Session gate
//!
//! Authenticates a bearer credential and produces the [`Identity`] consumed
//! by the evaluator. The identity is loaded fresh from the database on every
//! request with role and permissions materialized in one query, so admin
//! edits to roles or grants apply from the very next request.

use thiserror::Error;

use crate::auth::evaluator::Identity;
use crate::auth::jwt::JwtError;
use crate::core::ServerState;
use crate::db::repository::{RepoError, UserRepository};
use crate::security_log;
use crate::utils::AppError;
use crate::utils::time::now_millis;

/// Authentication failure modes, mapped 1:1 onto HTTP statuses at the
/// boundary (401 / 401 / 401 / 403 / 423 / 500).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("invalid token")]
    InvalidToken,

    #[error("token expired")]
    TokenExpired,

    #[error("account is inactive")]
    AccountInactive,

    #[error("account is locked")]
    AccountLocked { retry_after_secs: i64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthenticated => AppError::Unauthorized,
            AuthError::InvalidToken => AppError::InvalidToken,
            AuthError::TokenExpired => AppError::TokenExpired,
            AuthError::AccountInactive => AppError::AccountInactive,
            AuthError::AccountLocked { retry_after_secs } => {
                AppError::AccountLocked { retry_after_secs }
            }
            AuthError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Authenticate a bearer token and load the caller's identity.
///
/// On success the identity's last-seen timestamp and network origin are
/// recorded as a detached write; a failure there is logged and never changes
/// the authentication outcome.
pub async fn authenticate(
    state: &ServerState,
    token: Option<&str>,
    client_ip: Option<String>,
) -> Result<Identity, AuthError> {
    let token = token.ok_or(AuthError::Unauthenticated)?;

    let claims = state
        .get_jwt_service()
        .validate_token(token)
        .map_err(|e| match e {
            JwtError::ExpiredToken => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

    let repo = UserRepository::new(state.get_db());
    let user = match repo.find_hydrated(&claims.sub).await {
        Ok(user) => user.ok_or(AuthError::Unauthenticated)?,
        // A subject that is not even a user id is just a bad credential
        Err(RepoError::Validation(_)) => return Err(AuthError::Unauthenticated),
        Err(e) => {
            return Err(AuthError::Internal(format!("Failed to load identity: {}", e)));
        }
    };

    if !user.is_active {
        security_log!("WARN", "account_inactive", user_id = claims.sub.clone());
        return Err(AuthError::AccountInactive);
    }

    let now = now_millis();
    if let Some(until) = user.lock_until
        && until > now
    {
        security_log!("WARN", "account_locked", user_id = claims.sub.clone());
        // Round up so the client never retries a second early
        return Err(AuthError::AccountLocked {
            retry_after_secs: (until - now + 999) / 1000,
        });
    }

    let identity = Identity::from(user);

    // Best-effort last-seen bookkeeping, detached from the request outcome
    let seen_repo = UserRepository::new(state.get_db());
    let seen_id = identity.id.clone();
    tokio::spawn(async move {
        if let Err(e) = seen_repo.touch_last_seen(&seen_id, client_ip).await {
            tracing::warn!(user_id = %seen_id, error = %e, "Failed to record last-seen");
        }
    });

    Ok(identity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::catalog::ROLE_STORE_MANAGER;
    use crate::core::Config;
    use crate::db::models::{UserCreate, UserUpdate};
    use crate::db::{DbService, seed};

    async fn test_state() -> ServerState {
        let db = DbService::open_in_memory().await.expect("in-memory db");
        seed::ensure_seed_data(&db).await.expect("seed");
        ServerState::with_db(Config::for_tests(), db)
    }

    async fn create_manager(state: &ServerState) -> String {
        let repo = UserRepository::new(state.get_db());
        let user = repo
            .create(UserCreate {
                name: "Morgan".to_string(),
                email: "morgan@example.com".to_string(),
                password: "a-strong-password".to_string(),
                role: Some(ROLE_STORE_MANAGER.to_string()),
                is_admin: false,
            })
            .await
            .expect("create user");
        user.id.expect("id").to_string()
    }

    #[tokio::test]
    async fn test_missing_token_is_unauthenticated() {
        let state = test_state().await;
        let err = authenticate(&state, None, None).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let state = test_state().await;
        let err = authenticate(&state, Some("not.a.jwt"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_valid_token_loads_identity() {
        let state = test_state().await;
        let user_id = create_manager(&state).await;
        let token = state.get_jwt_service().generate_token(&user_id).expect("token");

        let identity = authenticate(&state, Some(&token), None).await.expect("auth");
        assert_eq!(identity.email, "morgan@example.com");
        let role = identity.role.as_ref().expect("role");
        assert_eq!(role.slug, ROLE_STORE_MANAGER);
        assert!(!role.permissions.is_empty(), "role permissions materialized");
        assert!(identity.has_permission("orders.read"));
        assert!(!identity.has_permission("users.delete"));
    }

    #[tokio::test]
    async fn test_vanished_user_is_unauthenticated() {
        let state = test_state().await;
        let token = state
            .get_jwt_service()
            .generate_token("user:doesnotexist")
            .expect("token");

        let err = authenticate(&state, Some(&token), None).await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_inactive_account_rejected() {
        let state = test_state().await;
        let user_id = create_manager(&state).await;
        let repo = UserRepository::new(state.get_db());
        repo.update(
            &user_id,
            UserUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .expect("deactivate");

        let token = state.get_jwt_service().generate_token(&user_id).expect("token");
        let err = authenticate(&state, Some(&token), None).await.unwrap_err();
        assert!(matches!(err, AuthError::AccountInactive));
    }

    #[tokio::test]
    async fn test_locked_account_rejected_with_retry_hint() {
        let state = test_state().await;
        let user_id = create_manager(&state).await;
        let repo = UserRepository::new(state.get_db());

        // Five consecutive failures trip the lock
        for _ in 0..5 {
            repo.record_failed_login(&user_id).await.expect("failure");
        }

        let token = state.get_jwt_service().generate_token(&user_id).expect("token");
        let err = authenticate(&state, Some(&token), None).await.unwrap_err();
        match err {
            AuthError::AccountLocked { retry_after_secs } => {
                assert!(retry_after_secs > 0);
                assert!(retry_after_secs <= 2 * 60 * 60);
            }
            other => panic!("expected AccountLocked, got {:?}", other),
        }
    }
}
