//! Brand Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Brand ID type
pub type BrandId = RecordId;

/// Product brand / supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BrandId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_verified: bool,
}

/// Create brand payload
#[derive(Debug, Deserialize)]
pub struct BrandCreate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub is_verified: bool,
}

/// Update brand payload
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BrandUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}
