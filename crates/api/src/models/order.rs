//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use heartwood_core::{OrderId, OwnerId, ProductId, Quantity};

/// One line of an order. Same shape as a cart item, but frozen: order lines
/// are never updated after checkout.
#[derive(Debug, Clone, FromRow)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub quantity: Quantity,
}

impl OrderItem {
    /// The amount this line contributes to the order total.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity.get())
    }
}

/// An immutable order created from a cart at checkout time.
///
/// Independent of the cart after creation: no back-reference, no shared
/// mutation.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: OrderId,
    pub owner_id: OwnerId,
    pub items: Vec<OrderItem>,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}
