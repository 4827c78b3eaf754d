//! Product catalog domain type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

use heartwood_core::ProductId;

/// A catalog product.
///
/// The catalog is read-only at request time; rows are written by the seeding
/// CLI. Cart items copy `name`, `price` and `image_url` from here when an
/// item is first added.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image_url: String,
    pub category: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}
