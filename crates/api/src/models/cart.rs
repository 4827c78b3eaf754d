//! Cart domain types.

use rust_decimal::Decimal;
use sqlx::FromRow;

use heartwood_core::{OwnerId, ProductId, Quantity};

use crate::models::Product;

/// One line of a cart: a product reference, a quantity, and the product's
/// display fields as they looked when the item was first added.
///
/// The snapshot fields are deliberately denormalized so rendering a cart
/// never joins against the catalog; they change only through an explicit
/// refresh.
#[derive(Debug, Clone, FromRow)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub quantity: Quantity,
}

impl CartItem {
    /// Build a fresh line item by snapshotting a catalog product.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: Quantity) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity,
        }
    }
}

/// A user's cart: the owner and an ordered sequence of line items, unique by
/// product.
///
/// Absence of a stored cart is a valid state and is represented by
/// [`Cart::empty`]; it is never an error.
#[derive(Debug, Clone)]
pub struct Cart {
    pub owner_id: OwnerId,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// The empty cart value returned for owners who have never added an item.
    #[must_use]
    pub const fn empty(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            items: Vec::new(),
        }
    }
}
