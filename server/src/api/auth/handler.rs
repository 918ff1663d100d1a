//! Authentication Handlers
//!
//! Login, registration, session info and logout.

use std::time::Duration;

use axum::{Extension, Json, extract::State, http::HeaderMap};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::Identity;
use crate::auth::middleware::client_ip;
use crate::core::ServerState;
use crate::db::models::{RoleDetail, UserCreate};
use crate::db::repository::{StoreSettingsRepository, UserRepository};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResponse, AppResult, ok_with_message};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RoleInfo {
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    pub level: u8,
}

impl From<&RoleDetail> for RoleInfo {
    fn from(role: &RoleDetail) -> Self {
        Self {
            id: role.id.as_ref().map(|i| i.to_string()),
            name: role.name.clone(),
            slug: role.slug.clone(),
            level: role.level,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub is_active: bool,
    pub role: Option<RoleInfo>,
    /// Effective permission slugs (role union direct, active only)
    pub permissions: Vec<String>,
    pub last_login: Option<i64>,
}

impl From<&Identity> for UserInfo {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.to_string(),
            name: identity.name.clone(),
            email: identity.email.clone(),
            is_admin: identity.is_admin(),
            is_active: identity.is_active,
            role: identity.role.as_ref().map(RoleInfo::from),
            permissions: identity
                .effective_permissions()
                .into_iter()
                .map(|p| p.slug)
                .collect(),
            last_login: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/login
///
/// Verifies credentials with failed-attempt bookkeeping: the fifth
/// consecutive failure locks the account for two hours, a success clears
/// the counter.
pub async fn login(
    State(state): State<ServerState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_email(&req.email).await?;

    // Fixed delay before acting on the result, to keep timing uniform
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => user,
        None => {
            tracing::warn!(email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    let user_id = user
        .id
        .as_ref()
        .map(|i| i.to_string())
        .ok_or_else(|| AppError::Internal("User record has no id".to_string()))?;

    let now = now_millis();
    if let Some(until) = user.lock_until
        && until > now
    {
        return Err(AppError::AccountLocked {
            retry_after_secs: (until - now + 999) / 1000,
        });
    }

    if !user.is_active {
        return Err(AppError::AccountInactive);
    }

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

    if !password_valid {
        let updated = repo.record_failed_login(&user_id).await?;
        tracing::warn!(
            email = %req.email,
            attempts = updated.login_attempts,
            locked = updated.is_locked(now_millis()),
            "Login failed - invalid credentials"
        );
        return Err(AppError::invalid_credentials());
    }

    // Success: clear bookkeeping, record last-seen
    repo.reset_login_attempts(&user_id).await?;
    let ip = client_ip(&headers);
    if let Some(id) = &user.id {
        repo.touch_last_seen(id, ip.clone()).await?;
    }

    let hydrated = repo
        .find_hydrated(&user_id)
        .await?
        .ok_or_else(|| AppError::Internal("User vanished during login".to_string()))?;

    if let Some(role) = &hydrated.role
        && !role.is_active
    {
        return Err(AppError::Forbidden("Role has been disabled".to_string()));
    }

    let token = state
        .get_jwt_service()
        .generate_token(&user_id)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    let identity = Identity::from(hydrated);
    state
        .activity
        .record(&identity, "auth.login", "auth", None, serde_json::json!({}), ip);

    tracing::info!(user_id = %user_id, email = %identity.email, "User logged in");

    let mut user_info = UserInfo::from(&identity);
    user_info.last_login = Some(now_millis());

    Ok(Json(LoginResponse {
        token,
        user: user_info,
    }))
}

/// POST /api/auth/register
///
/// Open self-registration onto the customer role, honoring the store's
/// `allow_registration` setting.
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<Json<LoginResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let settings = StoreSettingsRepository::new(state.get_db()).get().await?;
    if !settings.allow_registration {
        return Err(AppError::Forbidden(
            "Registration is currently disabled".to_string(),
        ));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            name: req.name,
            email: req.email,
            password: req.password,
            role: None,
            is_admin: false,
        })
        .await?;

    let user_id = user
        .id
        .as_ref()
        .map(|i| i.to_string())
        .ok_or_else(|| AppError::Internal("Created user has no id".to_string()))?;

    let hydrated = repo
        .find_hydrated(&user_id)
        .await?
        .ok_or_else(|| AppError::Internal("User vanished after registration".to_string()))?;

    let token = state
        .get_jwt_service()
        .generate_token(&user_id)
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

    let identity = Identity::from(hydrated);
    tracing::info!(user_id = %user_id, email = %identity.email, "User registered");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&identity),
    }))
}

/// GET /api/auth/me
pub async fn me(Extension(identity): Extension<Identity>) -> AppResult<Json<UserInfo>> {
    Ok(Json(UserInfo::from(&identity)))
}

/// POST /api/auth/logout
///
/// Stateless tokens cannot be revoked server-side; this records the event
/// for the activity trail.
pub async fn logout(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    headers: HeaderMap,
) -> AppResult<Json<AppResponse<()>>> {
    state.activity.record(
        &identity,
        "auth.logout",
        "auth",
        None,
        serde_json::json!({}),
        client_ip(&headers),
    );

    tracing::info!(user_id = %identity.id, email = %identity.email, "User logged out");
    Ok(ok_with_message((), "Logged out successfully"))
}
