//! Order route handlers.
//!
//! Checkout accepts the client's cart snapshot, recomputes the total, and
//! converts it into an immutable order while clearing the cart in the same
//! transaction.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use heartwood_core::{OrderId, OwnerId, ProductId};

use crate::error::AppError;
use crate::middleware::{RequireAuth, ensure_owner};
use crate::models::Order;
use crate::routes::cart::CartItemDto;
use crate::services::{NewOrderItem, OrderService};
use crate::state::AppState;

/// Submitted order line.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: String,
}

impl From<OrderItemPayload> for NewOrderItem {
    fn from(item: OrderItemPayload) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name,
            price: item.price,
            image_url: item.image_url,
            quantity: item.quantity,
        }
    }
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub user_id: OwnerId,
    pub items: Vec<OrderItemPayload>,
    pub total_amount: Decimal,
}

/// Order JSON representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: OrderId,
    pub user_id: OwnerId,
    pub items: Vec<CartItemDto>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            user_id: order.owner_id,
            items: order.items.iter().map(CartItemDto::from).collect(),
            total_amount: order.total_amount,
            created_at: order.created_at,
        }
    }
}

/// Order history JSON representation.
#[derive(Debug, Serialize)]
pub struct OrderListDto {
    pub orders: Vec<OrderDto>,
}

/// Checkout: create an order and clear the owner's cart.
///
/// POST /orders
#[instrument(skip(state, user, req))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_owner(&user, req.user_id)?;

    let items = req.items.into_iter().map(NewOrderItem::from).collect();
    let order = OrderService::new(state.pool())
        .place_order(req.user_id, items, req.total_amount)
        .await?;

    Ok((StatusCode::CREATED, Json(OrderDto::from(&order))))
}

/// The owner's order history, newest first.
///
/// GET /orders/{ownerId}
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(owner_id): Path<OwnerId>,
) -> Result<Json<OrderListDto>, AppError> {
    ensure_owner(&user, owner_id)?;

    let orders = OrderService::new(state.pool()).list_orders(owner_id).await?;

    Ok(Json(OrderListDto {
        orders: orders.iter().map(OrderDto::from).collect(),
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use heartwood_core::Quantity;
    use serde_json::json;

    use crate::models::OrderItem;

    #[test]
    fn test_place_order_request_accepts_camel_case() {
        let body = json!({
            "userId": OwnerId::generate().to_string(),
            "items": [{
                "productId": ProductId::generate().to_string(),
                "name": "Queen Bed Frame",
                "price": "799.99",
                "quantity": 1,
                "imageUrl": "https://example.com/bed.jpg",
            }],
            "totalAmount": "799.99",
        });

        let req: PlaceOrderRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.items.len(), 1);
        assert_eq!(req.total_amount, "799.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_order_dto_shape() {
        let order = Order {
            id: OrderId::generate(),
            owner_id: OwnerId::generate(),
            items: vec![OrderItem {
                product_id: ProductId::generate(),
                name: "Wooden bench".to_owned(),
                price: "1999.99".parse().unwrap(),
                image_url: "https://example.com/bench.jpg".to_owned(),
                quantity: Quantity::new(2).unwrap(),
            }],
            total_amount: "3999.98".parse().unwrap(),
            created_at: Utc::now(),
        };

        let value = serde_json::to_value(OrderDto::from(&order)).unwrap();

        assert_eq!(value["id"], order.id.to_string());
        assert_eq!(value["userId"], order.owner_id.to_string());
        assert_eq!(value["totalAmount"], "3999.98");
        assert_eq!(value["items"][0]["quantity"], 2);
        assert_eq!(value["items"][0]["imageUrl"], "https://example.com/bench.jpg");
    }
}
