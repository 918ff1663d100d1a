//! Product Model
//!
//! Category and brand are single normalized references. The `legacy_category`
//! and `legacy_brand` name strings only exist on records imported from the
//! previous schema and are consumed by the startup backfill migration.

use super::serde_helpers;
use super::{BrandId, CategoryId, CertificationId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Product ID type
pub type ProductId = RecordId;

/// Measurement unit for product weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    G,
    Kg,
    Ml,
    L,
    Pieces,
    Oz,
    Lb,
}

impl Default for WeightUnit {
    fn default() -> Self {
        WeightUnit::G
    }
}

/// Product record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub category: Option<CategoryId>,
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub brand: Option<BrandId>,
    /// Denormalized names from the previous schema, cleared by the backfill
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_brand: Option<String>,
    #[serde(default)]
    pub product_type: String,
    #[serde(default, with = "serde_helpers::vec_record_id")]
    pub certifications: Vec<CertificationId>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub unit: WeightUnit,
    pub price: Decimal,
    #[serde(default)]
    pub price_per_unit: Option<Decimal>,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_organic: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_vegan: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_gluten_free: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_fair_trade: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_featured: bool,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub num_reviews: u32,
    #[serde(default)]
    pub created_at: i64,
}

/// Create product payload (category/brand/certifications as record id strings)
#[derive(Debug, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    #[serde(default)]
    pub product_type: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub unit: WeightUnit,
    pub price: Decimal,
    #[serde(default)]
    pub price_per_unit: Option<Decimal>,
    #[serde(default)]
    pub count_in_stock: u32,
    #[serde(default)]
    pub is_organic: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_gluten_free: bool,
    #[serde(default)]
    pub is_fair_trade: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update product payload
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    // These accept "table:id" strings from the API; they serialize natively
    // so the merge stores record links
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::option_record_id::deserialize"
    )]
    pub category: Option<CategoryId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::option_record_id::deserialize"
    )]
    pub brand: Option<BrandId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "serde_helpers::option_vec_record_id::deserialize"
    )]
    pub certifications: Option<Vec<CertificationId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<WeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_per_unit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_in_stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_organic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_vegan: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_gluten_free: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_fair_trade: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_new_arrival: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Storefront listing filters
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub product_type: Option<String>,
    pub is_organic: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_fair_trade: Option<bool>,
    pub page: Option<usize>,
}

/// Paged product listing
#[derive(Debug, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}
