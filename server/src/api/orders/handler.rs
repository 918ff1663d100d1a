//! Order API Handlers

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;

use crate::auth::Identity;
use crate::core::ServerState;
use crate::db::models::{Order, OrderCreate, OrderItem, OrderPage, OrderQuery};
use crate::db::repository::{OrderRepository, ProductRepository, StoreSettingsRepository};
use crate::utils::time::now_millis;
use crate::utils::{AppError, AppResult};

/// POST /api/orders - place an order
///
/// Prices every line from the current product record, applies the store's
/// tax rate and shipping rules, and decrements stock.
pub async fn place_order(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    if payload.items.is_empty() {
        return Err(AppError::Validation("Order has no items".to_string()));
    }

    let settings = StoreSettingsRepository::new(state.get_db()).get().await?;
    let products = ProductRepository::new(state.get_db());

    let mut items: Vec<OrderItem> = Vec::with_capacity(payload.items.len());
    let mut items_price = Decimal::ZERO;

    for line in &payload.items {
        if line.qty == 0 {
            return Err(AppError::Validation(
                "Order line quantity must be positive".to_string(),
            ));
        }

        let product = products
            .find_by_id(&line.product)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {} not found", line.product)))?;

        if product.count_in_stock < line.qty {
            return Err(AppError::BusinessRule(format!(
                "Insufficient stock for '{}'",
                product.name
            )));
        }

        let product_id = product
            .id
            .clone()
            .ok_or_else(|| AppError::Internal("Product record has no id".to_string()))?;

        items_price += product.price * Decimal::from(line.qty);
        items.push(OrderItem {
            product: product_id,
            name: product.name,
            qty: line.qty,
            price: product.price,
            image: product.image,
        });
    }

    if items_price < settings.min_order_amount {
        return Err(AppError::BusinessRule(format!(
            "Minimum order amount is {} {}",
            settings.min_order_amount, settings.currency
        )));
    }

    let free_shipping = settings
        .free_shipping_threshold
        .is_some_and(|threshold| items_price >= threshold);
    let shipping_price = if free_shipping {
        Decimal::ZERO
    } else {
        settings.shipping_flat_rate
    };
    let tax_price = (items_price * settings.tax_rate).round_dp(2);
    let total_price = items_price + shipping_price + tax_price;

    let order = Order {
        id: None,
        user: identity.id.clone(),
        items,
        shipping_address: payload.shipping_address,
        payment_method: payload.payment_method,
        items_price,
        shipping_price,
        tax_price,
        total_price,
        is_paid: false,
        paid_at: None,
        is_delivered: false,
        delivered_at: None,
        is_refunded: false,
        refunded_at: None,
        created_at: now_millis(),
    };

    let created = OrderRepository::new(state.get_db()).create(order).await?;

    for line in &payload.items {
        products.decrement_stock(&line.product, line.qty).await?;
    }

    tracing::info!(
        user_id = %identity.id,
        order_id = ?created.id,
        total = %created.total_price,
        "Order placed"
    );

    Ok(Json(created))
}

/// GET /api/orders/mine
pub async fn my_orders(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<Order>>> {
    let repo = OrderRepository::new(state.get_db());
    Ok(Json(repo.find_by_user(&identity.id).await?))
}

/// GET /api/orders/{id} - owner or admin tier only
pub async fn get_own(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;

    if !identity.owns_resource(&order) {
        return Err(AppError::Forbidden(
            "Access denied. You do not own this resource.".to_string(),
        ));
    }

    Ok(Json(order))
}

/// GET /api/admin/orders
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> AppResult<Json<OrderPage>> {
    let repo = OrderRepository::new(state.get_db());
    Ok(Json(repo.find_page(query).await?))
}

/// GET /api/admin/orders/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order {} not found", id)))?;
    Ok(Json(order))
}

/// PUT /api/admin/orders/{id}/pay
pub async fn mark_paid(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.mark_paid(&id).await?;

    state.activity.record(
        &identity,
        "order.paid",
        "order",
        Some(id),
        serde_json::json!({ "total": order.total_price }),
        None,
    );

    Ok(Json(order))
}

/// PUT /api/admin/orders/{id}/deliver
pub async fn mark_delivered(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.mark_delivered(&id).await?;

    state.activity.record(
        &identity,
        "order.delivered",
        "order",
        Some(id),
        serde_json::json!({}),
        None,
    );

    Ok(Json(order))
}

/// PUT /api/admin/orders/{id}/refund
pub async fn refund(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo.mark_refunded(&id).await?;

    state.activity.record(
        &identity,
        "order.refunded",
        "order",
        Some(id),
        serde_json::json!({ "total": order.total_price }),
        None,
    );

    Ok(Json(order))
}
