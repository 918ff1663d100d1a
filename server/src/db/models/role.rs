//! Role Model

use super::serde_helpers;
use super::{Permission, PermissionId};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;
use validator::Validate;

/// Role ID type
pub type RoleId = RecordId;

/// Role record as stored (permission set as references)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RoleId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Privilege rank: 1 is the most privileged, 10 the least
    pub level: u8,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub permissions: Vec<PermissionId>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

/// Role with its permission records materialized (FETCH result)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleDetail {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RoleId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub level: u8,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_system: bool,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create role request (permissions given as catalog slugs)
#[derive(Debug, Deserialize, Validate)]
pub struct RoleCreate {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[validate(length(min = 1, max = 64))]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[validate(range(min = 1, max = 10))]
    pub level: u8,
    #[serde(default)]
    pub permissions: Vec<String>,
}

/// Update role request
#[derive(Debug, Default, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub level: Option<u8>,
    pub permissions: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl RoleUpdate {
    /// True if any protected identity field of a system role is being changed
    pub fn touches_identity(&self) -> bool {
        self.name.is_some()
            || self.slug.is_some()
            || self.level.is_some()
            || self.description.is_some()
    }
}
