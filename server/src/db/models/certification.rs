//! Certification Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Certification ID type
pub type CertificationId = RecordId;

/// Organic / quality certification (e.g. USDA Organic, Fair Trade)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<CertificationId>,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create certification payload
#[derive(Debug, Deserialize)]
pub struct CertificationCreate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub issuer: String,
}

/// Update certification payload
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CertificationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
