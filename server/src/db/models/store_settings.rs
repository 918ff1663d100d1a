//! Store Settings Model (singleton)

use super::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Store-wide configuration, a single record created by the seed step at
/// process start. Request paths only ever read or merge-update it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    pub store_name: String,
    #[serde(default)]
    pub store_description: String,
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub address: Address,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub tax_rate: Decimal,
    #[serde(default)]
    pub min_order_amount: Decimal,
    #[serde(default)]
    pub shipping_flat_rate: Decimal,
    #[serde(default)]
    pub free_shipping_threshold: Option<Decimal>,
    #[serde(default = "default_low_stock")]
    pub low_stock_threshold: u32,
    #[serde(default = "default_true")]
    pub allow_registration: bool,
    #[serde(default)]
    pub updated_at: i64,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_low_stock() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            store_name: "Verdant Organic Store".to_string(),
            store_description: String::new(),
            contact_email: "contact@verdant.example".to_string(),
            contact_phone: String::new(),
            address: Address::default(),
            currency: default_currency(),
            tax_rate: Decimal::ZERO,
            min_order_amount: Decimal::ZERO,
            shipping_flat_rate: Decimal::ZERO,
            free_shipping_threshold: None,
            low_stock_threshold: default_low_stock(),
            allow_registration: true,
            updated_at: 0,
        }
    }
}

/// Merge-update payload for store settings
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct StoreSettingsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_order_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_flat_rate: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_shipping_threshold: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_registration: Option<bool>,
}

/// Public storefront subset of the settings
#[derive(Debug, Serialize)]
pub struct StoreProfile {
    pub store_name: String,
    pub store_description: String,
    pub currency: String,
    pub free_shipping_threshold: Option<Decimal>,
}

impl From<StoreSettings> for StoreProfile {
    fn from(s: StoreSettings) -> Self {
        Self {
            store_name: s.store_name,
            store_description: s.store_description,
            currency: s.currency,
            free_shipping_threshold: s.free_shipping_threshold,
        }
    }
}
