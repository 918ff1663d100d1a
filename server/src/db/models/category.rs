//! Category Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Category ID type
pub type CategoryId = RecordId;

/// Product category, optionally nested under a parent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CategoryId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub display_order: i32,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create category payload
#[derive(Debug, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub parent: Option<String>,
    #[serde(default)]
    pub display_order: i32,
}

/// Update category payload
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    // Accepts "category:id" strings from the API; serializes natively so the
    // merge stores a record link
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::option_record_id::deserialize"
    )]
    pub parent: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
