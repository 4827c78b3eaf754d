//! Cart repository.
//!
//! Every mutation runs in a transaction that first touches the owner's
//! `cart` row, taking its row lock. Concurrent mutations for the same owner
//! therefore serialize at the storage layer, which is what makes the
//! accumulate-quantity invariant hold under racing add calls.

use sqlx::{PgPool, Postgres, Transaction};

use heartwood_core::{OwnerId, ProductId, Quantity};

use super::RepositoryError;
use crate::models::{CartItem, Product};

const ITEM_SELECT: &str = "SELECT product_id, name, price, image_url, quantity \
     FROM cart_item WHERE owner_id = $1 ORDER BY position";

/// Repository for cart persistence.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// The owner's line items in insertion order. Empty when no cart exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, owner_id: OwnerId) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(ITEM_SELECT)
            .bind(owner_id)
            .fetch_all(self.pool)
            .await?;

        Ok(items)
    }

    /// Whether a cart row exists for this owner.
    ///
    /// A cart can exist with zero items (every item removed); that is
    /// distinct from never having had a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, owner_id: OwnerId) -> Result<bool, RepositoryError> {
        let row = sqlx::query_scalar::<_, i32>("SELECT 1 FROM cart WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.is_some())
    }

    /// Add a snapshot item, creating the cart lazily and accumulating the
    /// quantity when the product is already present.
    ///
    /// Returns the full persisted item list, re-read inside the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails.
    pub async fn add_item(
        &self,
        owner_id: OwnerId,
        item: &CartItem,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lazy-create the cart; the upsert takes the row lock either way.
        sqlx::query(
            "INSERT INTO cart (owner_id) VALUES ($1) \
             ON CONFLICT (owner_id) DO UPDATE SET updated_at = now()",
        )
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO cart_item (owner_id, product_id, name, price, image_url, quantity) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (owner_id, product_id) \
             DO UPDATE SET quantity = cart_item.quantity + EXCLUDED.quantity",
        )
        .bind(owner_id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(&item.image_url)
        .bind(item.quantity)
        .execute(&mut *tx)
        .await?;

        let items = Self::items_tx(&mut tx, owner_id).await?;
        tx.commit().await?;

        Ok(items)
    }

    /// Set an item's quantity to an absolute value.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner has no cart or the
    /// cart has no such item; `RepositoryError::Database` otherwise.
    pub async fn set_quantity(
        &self,
        owner_id: OwnerId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_cart(&mut tx, owner_id).await?;

        let updated = sqlx::query(
            "UPDATE cart_item SET quantity = $3 WHERE owner_id = $1 AND product_id = $2",
        )
        .bind(owner_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let items = Self::items_tx(&mut tx, owner_id).await?;
        tx.commit().await?;

        Ok(items)
    }

    /// Remove an item. The cart row persists even when it empties.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner has no cart or the
    /// cart has no such item; `RepositoryError::Database` otherwise.
    pub async fn remove_item(
        &self,
        owner_id: OwnerId,
        product_id: ProductId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_cart(&mut tx, owner_id).await?;

        let deleted =
            sqlx::query("DELETE FROM cart_item WHERE owner_id = $1 AND product_id = $2")
                .bind(owner_id)
                .bind(product_id)
                .execute(&mut *tx)
                .await?;

        if deleted.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let items = Self::items_tx(&mut tx, owner_id).await?;
        tx.commit().await?;

        Ok(items)
    }

    /// Overwrite the snapshot fields of existing items from fresh catalog
    /// rows. Items whose product is not in `products` are left untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner has no cart;
    /// `RepositoryError::Database` otherwise.
    pub async fn refresh_snapshots(
        &self,
        owner_id: OwnerId,
        products: &[Product],
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_cart(&mut tx, owner_id).await?;

        for product in products {
            sqlx::query(
                "UPDATE cart_item SET name = $3, price = $4, image_url = $5 \
                 WHERE owner_id = $1 AND product_id = $2",
            )
            .bind(owner_id)
            .bind(product.id)
            .bind(&product.name)
            .bind(product.price)
            .bind(&product.image_url)
            .execute(&mut *tx)
            .await?;
        }

        let items = Self::items_tx(&mut tx, owner_id).await?;
        tx.commit().await?;

        Ok(items)
    }

    /// Take the owner's cart-row lock, failing when no cart exists.
    async fn lock_cart(
        tx: &mut Transaction<'_, Postgres>,
        owner_id: OwnerId,
    ) -> Result<(), RepositoryError> {
        let touched = sqlx::query("UPDATE cart SET updated_at = now() WHERE owner_id = $1")
            .bind(owner_id)
            .execute(&mut **tx)
            .await?;

        if touched.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Re-read the item list inside the surrounding transaction so the
    /// returned representation is exactly what was persisted.
    async fn items_tx(
        tx: &mut Transaction<'_, Postgres>,
        owner_id: OwnerId,
    ) -> Result<Vec<CartItem>, RepositoryError> {
        let items = sqlx::query_as::<_, CartItem>(ITEM_SELECT)
            .bind(owner_id)
            .fetch_all(&mut **tx)
            .await?;

        Ok(items)
    }
}
