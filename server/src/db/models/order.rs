//! Order Model

use super::serde_helpers;
use super::{ProductId, UserId};
use crate::auth::Owned;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Order ID type
pub type OrderId = RecordId;

/// Postal address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub zip: String,
}

/// A purchased line item, denormalized at order time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(with = "serde_helpers::record_id")]
    pub product: ProductId,
    pub name: String,
    pub qty: u32,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
}

/// Order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<OrderId>,
    #[serde(with = "serde_helpers::record_id")]
    pub user: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub payment_method: String,
    pub items_price: Decimal,
    pub shipping_price: Decimal,
    pub tax_price: Decimal,
    pub total_price: Decimal,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_paid: bool,
    #[serde(default)]
    pub paid_at: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_delivered: bool,
    #[serde(default)]
    pub delivered_at: Option<i64>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_refunded: bool,
    #[serde(default)]
    pub refunded_at: Option<i64>,
    #[serde(default)]
    pub created_at: i64,
}

impl Owned for Order {
    fn owner(&self) -> Option<&RecordId> {
        Some(&self.user)
    }
}

/// Place order payload
#[derive(Debug, Deserialize)]
pub struct OrderCreate {
    pub items: Vec<OrderItemInput>,
    pub shipping_address: Address,
    pub payment_method: String,
}

/// Cart line item in a place-order request
#[derive(Debug, Deserialize)]
pub struct OrderItemInput {
    pub product: String,
    pub qty: u32,
}

/// Admin order listing filters
#[derive(Debug, Default, Deserialize)]
pub struct OrderQuery {
    /// pending | paid | delivered
    pub status: Option<String>,
    pub user: Option<String>,
    pub start_date: Option<i64>,
    pub end_date: Option<i64>,
    pub page: Option<usize>,
}

/// Paged order listing
#[derive(Debug, Serialize)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub page: usize,
    pub pages: usize,
    pub total: usize,
}
