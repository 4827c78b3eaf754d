//! Order repository.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use heartwood_core::{OrderId, OwnerId, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{Order, OrderItem};

/// Order header row.
#[derive(FromRow)]
struct OrderHead {
    id: OrderId,
    owner_id: OwnerId,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
}

/// Order line row, tagged with its order for grouping.
#[derive(FromRow)]
struct OrderLine {
    order_id: OrderId,
    product_id: ProductId,
    name: String,
    price: Decimal,
    image_url: String,
    quantity: Quantity,
}

/// Repository for order persistence.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an immutable order and clear the owner's cart items, as one
    /// transaction: either both happen or neither does.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is persisted in that case.
    pub async fn create_and_clear_cart(
        &self,
        owner_id: OwnerId,
        items: Vec<OrderItem>,
        total_amount: Decimal,
    ) -> Result<Order, RepositoryError> {
        let id = OrderId::generate();
        let mut tx = self.pool.begin().await?;

        let created_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            "INSERT INTO store_order (id, owner_id, total_amount) \
             VALUES ($1, $2, $3) RETURNING created_at",
        )
        .bind(id)
        .bind(owner_id)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await?;

        for (position, item) in (0_i32..).zip(items.iter()) {
            sqlx::query(
                "INSERT INTO order_item \
                 (order_id, position, product_id, name, price, image_url, quantity) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(id)
            .bind(position)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(&item.image_url)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_item WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Order {
            id,
            owner_id,
            items,
            total_amount,
            created_at,
        })
    }

    /// The owner's orders, newest first, with their line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_owner(&self, owner_id: OwnerId) -> Result<Vec<Order>, RepositoryError> {
        let heads = sqlx::query_as::<_, OrderHead>(
            "SELECT id, owner_id, total_amount, created_at \
             FROM store_order WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;

        if heads.is_empty() {
            return Ok(Vec::new());
        }

        let order_ids: Vec<Uuid> = heads.iter().map(|h| h.id.as_uuid()).collect();
        let lines = sqlx::query_as::<_, OrderLine>(
            "SELECT order_id, product_id, name, price, image_url, quantity \
             FROM order_item WHERE order_id = ANY($1) ORDER BY order_id, position",
        )
        .bind(order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut grouped: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for line in lines {
            grouped.entry(line.order_id).or_default().push(OrderItem {
                product_id: line.product_id,
                name: line.name,
                price: line.price,
                image_url: line.image_url,
                quantity: line.quantity,
            });
        }

        Ok(heads
            .into_iter()
            .map(|head| Order {
                items: grouped.remove(&head.id).unwrap_or_default(),
                id: head.id,
                owner_id: head.owner_id,
                total_amount: head.total_amount,
                created_at: head.created_at,
            })
            .collect())
    }
}
