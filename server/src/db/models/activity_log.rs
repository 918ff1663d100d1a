//! Activity Log Model

use super::serde_helpers;
use super::UserId;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Activity log ID type
pub type ActivityLogId = RecordId;

/// One admin action, recorded fire-and-forget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ActivityLogId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub actor: Option<UserId>,
    pub actor_name: String,
    /// Dotted action name, e.g. "role.updated"
    pub action: String,
    pub target_type: String,
    #[serde(default)]
    pub target_id: Option<String>,
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

/// Activity log listing filters
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub action: Option<String>,
    pub target_type: Option<String>,
    pub page: Option<usize>,
}
