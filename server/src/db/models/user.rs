//! User Model

use super::serde_helpers;
use super::{Permission, PermissionId, RoleDetail, RoleId};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// User ID type
pub type UserId = RecordId;

/// Failed logins tolerated before the account locks
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Lock duration after too many failed logins (2 hours)
pub const LOCK_DURATION_MS: i64 = 2 * 60 * 60 * 1000;

/// User record as stored (role and direct permissions as references)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_admin: bool,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub role: Option<RoleId>,
    /// Direct (role-override) permissions, additive to role permissions
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub permissions: Vec<PermissionId>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub login_attempts: u32,
    #[serde(default)]
    pub lock_until: Option<i64>,
    #[serde(default)]
    pub last_login: Option<i64>,
    #[serde(default)]
    pub last_login_ip: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// User with role and permission records materialized (FETCH result)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserHydrated {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<UserId>,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_admin: bool,
    #[serde(default)]
    pub role: Option<RoleDetail>,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
    #[serde(default)]
    pub login_attempts: u32,
    #[serde(default)]
    pub lock_until: Option<i64>,
    #[serde(default)]
    pub last_login: Option<i64>,
    #[serde(default)]
    pub last_login_ip: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

fn default_true() -> bool {
    true
}

/// Create user payload (role given as a role slug)
#[derive(Debug, Deserialize, Validate)]
pub struct UserCreate {
    #[validate(length(min = 1, max = 128))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub role: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Update user payload (role as slug, direct permissions as catalog slugs)
#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

/// Admin user listing filters
#[derive(Debug, Default, Deserialize)]
pub struct UserQuery {
    /// Role slug filter
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub keyword: Option<String>,
    pub page: Option<usize>,
}

/// Paged user listing
#[derive(Debug, Serialize)]
pub struct UserPage {
    pub users: Vec<UserHydrated>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}

impl User {
    /// True while a lock expiry is set and still in the future
    pub fn is_locked(&self, now: i64) -> bool {
        matches!(self.lock_until, Some(until) if until > now)
    }

    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}

impl UserHydrated {
    pub fn is_locked(&self, now: i64) -> bool {
        matches!(self.lock_until, Some(until) if until > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_user() -> User {
        User {
            id: None,
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: String::new(),
            is_admin: false,
            role: None,
            permissions: vec![],
            is_active: true,
            login_attempts: 0,
            lock_until: None,
            last_login: None,
            last_login_ip: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_lock_window() {
        let mut user = bare_user();
        assert!(!user.is_locked(1_000));

        user.lock_until = Some(2_000);
        assert!(user.is_locked(1_000));
        assert!(!user.is_locked(2_000));
        assert!(!user.is_locked(3_000));
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = User::hash_password("correct horse battery").expect("hash");
        let mut user = bare_user();
        user.password_hash = hash;

        assert!(user.verify_password("correct horse battery").expect("verify"));
        assert!(!user.verify_password("wrong").expect("verify"));
    }
}
