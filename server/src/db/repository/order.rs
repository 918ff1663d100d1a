//! Order Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Order, OrderPage, OrderQuery, UserId};
use crate::utils::time::now_millis;
use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "orders";
const PAGE_SIZE: usize = 20;

#[derive(Deserialize)]
struct CountRow {
    total: usize,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Insert a fully-priced order (pricing happens in the handler).
    /// The owner is bound separately so it lands as a record link.
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE orders SET
                    user = $user,
                    items = $items,
                    shipping_address = $shipping_address,
                    payment_method = $payment_method,
                    items_price = $items_price,
                    shipping_price = $shipping_price,
                    tax_price = $tax_price,
                    total_price = $total_price,
                    is_paid = false,
                    is_delivered = false,
                    is_refunded = false,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("user", order.user))
            .bind(("items", order.items))
            .bind(("shipping_address", order.shipping_address))
            .bind(("payment_method", order.payment_method))
            .bind(("items_price", order.items_price))
            .bind(("shipping_price", order.shipping_price))
            .bind(("tax_price", order.tax_price))
            .bind(("total_price", order.total_price))
            .bind(("created_at", order.created_at))
            .await?;
        let created: Option<Order> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let record = self.base.parse_id(TABLE, id)?;
        let order: Option<Order> = self.base.db().select(record).await?;
        Ok(order)
    }

    /// A user's own orders, newest first
    pub async fn find_by_user(&self, user: &UserId) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM orders WHERE user = $user ORDER BY created_at DESC")
            .bind(("user", user.clone()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Paged admin listing with status / user / date-range filters
    pub async fn find_page(&self, query: OrderQuery) -> RepoResult<OrderPage> {
        let mut conditions: Vec<&str> = vec![];

        match query.status.as_deref() {
            Some("pending") => {
                conditions.push("is_paid = false AND is_delivered = false");
            }
            Some("paid") => {
                conditions.push("is_paid = true AND is_delivered = false");
            }
            Some("delivered") => {
                conditions.push("is_delivered = true");
            }
            Some(other) => {
                return Err(RepoError::Validation(format!(
                    "Unknown order status filter: {}",
                    other
                )));
            }
            None => {}
        }

        let user = match &query.user {
            Some(id) => {
                conditions.push("user = $user");
                Some(self.base.parse_id("user", id)?)
            }
            None => None,
        };
        if query.start_date.is_some() {
            conditions.push("created_at >= $start_date");
        }
        if query.end_date.is_some() {
            conditions.push("created_at <= $end_date");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let page = query.page.unwrap_or(1).max(1);
        let select = format!(
            "SELECT * FROM orders{} ORDER BY created_at DESC LIMIT $limit START $start",
            where_clause
        );
        let count = format!(
            "SELECT count() AS total FROM orders{} GROUP ALL",
            where_clause
        );

        let mut result = self
            .base
            .db()
            .query(select)
            .query(count)
            .bind(("user", user))
            .bind(("start_date", query.start_date))
            .bind(("end_date", query.end_date))
            .bind(("limit", PAGE_SIZE))
            .bind(("start", PAGE_SIZE * (page - 1)))
            .await?;

        let orders: Vec<Order> = result.take(0)?;
        let total = result
            .take::<Vec<CountRow>>(1)?
            .into_iter()
            .next()
            .map(|r| r.total)
            .unwrap_or(0);

        Ok(OrderPage {
            orders,
            page,
            pages: total.div_ceil(PAGE_SIZE),
            total,
        })
    }

    pub async fn mark_paid(&self, id: &str) -> RepoResult<Order> {
        let order = self.require(id).await?;
        if order.is_paid {
            return Err(RepoError::Business("Order is already paid".to_string()));
        }
        self.set_flags(id, "is_paid = true, paid_at = $now").await
    }

    pub async fn mark_delivered(&self, id: &str) -> RepoResult<Order> {
        let order = self.require(id).await?;
        if !order.is_paid {
            return Err(RepoError::Business(
                "Cannot deliver an unpaid order".to_string(),
            ));
        }
        if order.is_delivered {
            return Err(RepoError::Business(
                "Order is already delivered".to_string(),
            ));
        }
        self.set_flags(id, "is_delivered = true, delivered_at = $now")
            .await
    }

    pub async fn mark_refunded(&self, id: &str) -> RepoResult<Order> {
        let order = self.require(id).await?;
        if !order.is_paid {
            return Err(RepoError::Business(
                "Cannot refund an unpaid order".to_string(),
            ));
        }
        if order.is_refunded {
            return Err(RepoError::Business("Order is already refunded".to_string()));
        }
        self.set_flags(id, "is_refunded = true, refunded_at = $now")
            .await
    }

    async fn require(&self, id: &str) -> RepoResult<Order> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    async fn set_flags(&self, id: &str, assignments: &str) -> RepoResult<Order> {
        let record = self.base.parse_id(TABLE, id)?;
        let sql = format!("UPDATE $order SET {} RETURN AFTER", assignments);
        let mut result = self
            .base
            .db()
            .query(sql)
            .bind(("order", record))
            .bind(("now", now_millis()))
            .await?;
        result
            .take::<Vec<Order>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }
}
