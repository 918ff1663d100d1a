//! Permission Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Permission ID type
pub type PermissionId = RecordId;

/// CRUD action a permission grants on its resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionAction {
    Create,
    Read,
    Update,
    Delete,
    Manage,
}

/// Permission record
///
/// Seeded once from the static catalog; only the active flag changes
/// afterwards. Authorization checks key off `slug`, never the record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PermissionId>,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub resource: String,
    pub action: PermissionAction,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
