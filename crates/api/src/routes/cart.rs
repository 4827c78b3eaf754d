//! Cart route handlers.
//!
//! Every route names an owner; the bearer token's user must match it.
//! Responses always carry the full persisted cart, so the client can render
//! without a follow-up read.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use heartwood_core::{OwnerId, ProductId};

use crate::error::AppError;
use crate::middleware::{RequireAuth, ensure_owner};
use crate::models::{Cart, CartItem, OrderItem};
use crate::services::CartService;
use crate::state::AppState;

/// Line item JSON representation, shared by cart and order payloads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemDto {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub image_url: String,
}

impl From<&CartItem> for CartItemDto {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity.get(),
            image_url: item.image_url.clone(),
        }
    }
}

impl From<&OrderItem> for CartItemDto {
    fn from(item: &OrderItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity.get(),
            image_url: item.image_url.clone(),
        }
    }
}

/// Cart JSON representation.
#[derive(Debug, Serialize)]
pub struct CartDto {
    pub items: Vec<CartItemDto>,
}

impl From<&Cart> for CartDto {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().map(CartItemDto::from).collect(),
        }
    }
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub owner_id: OwnerId,
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i32,
}

/// The owner's cart; an empty cart value when none exists, never an error.
///
/// GET /cart/{ownerId}
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(owner_id): Path<OwnerId>,
) -> Result<Json<CartDto>, AppError> {
    ensure_owner(&user, owner_id)?;

    let cart = CartService::new(state.pool(), state.product_cache())
        .get_cart(owner_id)
        .await?;

    Ok(Json(CartDto::from(&cart)))
}

/// Add an item, creating the cart lazily and accumulating quantities.
///
/// POST /cart
#[instrument(skip(state, user, req))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<AddItemRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_owner(&user, req.owner_id)?;

    let cart = CartService::new(state.pool(), state.product_cache())
        .add_item(req.owner_id, req.product_id, req.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(CartDto::from(&cart))))
}

/// Set an item's quantity (absolute set, not delta).
///
/// PUT /cart/{ownerId}/{productId}
#[instrument(skip(state, user, req))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((owner_id, product_id)): Path<(OwnerId, ProductId)>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Result<Json<CartDto>, AppError> {
    ensure_owner(&user, owner_id)?;

    let cart = CartService::new(state.pool(), state.product_cache())
        .update_quantity(owner_id, product_id, req.quantity)
        .await?;

    Ok(Json(CartDto::from(&cart)))
}

/// Remove an item; the cart persists even when it empties.
///
/// DELETE /cart/{ownerId}/{productId}
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((owner_id, product_id)): Path<(OwnerId, ProductId)>,
) -> Result<Json<CartDto>, AppError> {
    ensure_owner(&user, owner_id)?;

    let cart = CartService::new(state.pool(), state.product_cache())
        .remove_item(owner_id, product_id)
        .await?;

    Ok(Json(CartDto::from(&cart)))
}

/// Re-snapshot every line item's display fields from the catalog.
///
/// POST /cart/{ownerId}/refresh
#[instrument(skip(state, user))]
pub async fn refresh(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(owner_id): Path<OwnerId>,
) -> Result<Json<CartDto>, AppError> {
    ensure_owner(&user, owner_id)?;

    let cart = CartService::new(state.pool(), state.product_cache())
        .refresh_snapshots(owner_id)
        .await?;

    Ok(Json(CartDto::from(&cart)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use heartwood_core::Quantity;
    use serde_json::json;

    #[test]
    fn test_cart_item_dto_shape() {
        let item = CartItem {
            product_id: ProductId::generate(),
            name: "Modern Sofa".to_owned(),
            price: "999.99".parse().unwrap(),
            image_url: "https://example.com/sofa.webp".to_owned(),
            quantity: Quantity::new(2).unwrap(),
        };

        let value = serde_json::to_value(CartItemDto::from(&item)).unwrap();

        assert_eq!(
            value,
            json!({
                "productId": item.product_id.to_string(),
                "name": "Modern Sofa",
                "price": "999.99",
                "quantity": 2,
                "imageUrl": "https://example.com/sofa.webp",
            })
        );
    }

    #[test]
    fn test_empty_cart_serializes_to_empty_items() {
        let cart = Cart::empty(OwnerId::generate());
        let value = serde_json::to_value(CartDto::from(&cart)).unwrap();
        assert_eq!(value, json!({ "items": [] }));
    }

    #[test]
    fn test_add_item_request_accepts_camel_case() {
        let owner = OwnerId::generate();
        let product = ProductId::generate();
        let body = json!({
            "ownerId": owner.to_string(),
            "productId": product.to_string(),
            "quantity": 3,
        });

        let req: AddItemRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.owner_id, owner);
        assert_eq!(req.product_id, product);
        assert_eq!(req.quantity, 3);
    }
}
