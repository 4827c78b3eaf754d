//! Order service: checkout validation and the atomic order/cart handoff.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use heartwood_core::{OwnerId, ProductId, Quantity, QuantityError};

use crate::db::{OrderRepository, RepositoryError};
use crate::models::{Order, OrderItem};

/// Errors that can occur while placing or listing orders.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout with no items.
    #[error("order must contain at least one item")]
    EmptyItems,

    /// A line had a zero or negative quantity.
    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),

    /// The submitted total does not match the items.
    #[error("total amount mismatch: submitted {submitted}, computed {computed}")]
    TotalMismatch {
        submitted: Decimal,
        computed: Decimal,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// An order line as submitted at checkout, before validation.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub image_url: String,
    pub quantity: i32,
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Convert the submitted cart snapshot into an immutable order and clear
    /// the owner's cart, atomically.
    ///
    /// The total is recomputed server-side from the submitted items; a
    /// client total that disagrees is rejected rather than trusted.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyItems`, `OrderError::InvalidQuantity` or
    /// `OrderError::TotalMismatch` without mutating anything; or
    /// `OrderError::Repository` if persistence fails (also without partial
    /// effects — order insert and cart clear share one transaction).
    pub async fn place_order(
        &self,
        owner_id: OwnerId,
        items: Vec<NewOrderItem>,
        total_amount: Decimal,
    ) -> Result<Order, OrderError> {
        let (items, total) = validate_order(items, total_amount)?;

        Ok(self
            .orders
            .create_and_clear_cart(owner_id, items, total)
            .await?)
    }

    /// The owner's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store is unreachable.
    pub async fn list_orders(&self, owner_id: OwnerId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_for_owner(owner_id).await?)
    }
}

/// Check a submitted order against the rules that must hold before anything
/// is persisted: at least one line, every quantity positive, and the
/// submitted total equal to sum(quantity × price).
///
/// Returns the validated lines and the recomputed total.
///
/// # Errors
///
/// See [`OrderError`]; nothing is mutated on failure.
pub fn validate_order(
    items: Vec<NewOrderItem>,
    total_amount: Decimal,
) -> Result<(Vec<OrderItem>, Decimal), OrderError> {
    if items.is_empty() {
        return Err(OrderError::EmptyItems);
    }

    let items = items
        .into_iter()
        .map(|item| {
            Ok(OrderItem {
                product_id: item.product_id,
                name: item.name,
                price: item.price,
                image_url: item.image_url,
                quantity: Quantity::new(item.quantity)?,
            })
        })
        .collect::<Result<Vec<_>, QuantityError>>()?;

    let computed: Decimal = items.iter().map(OrderItem::line_total).sum();
    if computed != total_amount {
        return Err(OrderError::TotalMismatch {
            submitted: total_amount,
            computed,
        });
    }

    Ok((items, computed))
}
