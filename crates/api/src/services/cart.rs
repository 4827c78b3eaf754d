//! Cart service: the add/update/remove merge workflow.
//!
//! Validation happens here, before any mutation; persistence and per-owner
//! serialization live in [`CartRepository`]. Product display fields are
//! denormalized onto line items at add time, with catalog lookups going
//! through the shared in-process cache.

use sqlx::PgPool;
use thiserror::Error;

use heartwood_core::{OwnerId, ProductId, Quantity, QuantityError};

use crate::db::{CartRepository, ProductRepository, RepositoryError};
use crate::models::{Cart, CartItem, Product};
use crate::state::ProductCache;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity was zero or negative.
    #[error(transparent)]
    InvalidQuantity(#[from] QuantityError),

    /// The product does not exist in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// The cart has no line item for this product (or there is no cart).
    #[error("cart item not found: {0}")]
    ItemNotFound(ProductId),

    /// The owner has no cart at all.
    #[error("no cart for owner: {0}")]
    CartNotFound(OwnerId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    products: ProductRepository<'a>,
    carts: CartRepository<'a>,
    catalog: &'a ProductCache,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool, catalog: &'a ProductCache) -> Self {
        Self {
            products: ProductRepository::new(pool),
            carts: CartRepository::new(pool),
            catalog,
        }
    }

    /// The owner's cart. An owner who never added anything gets the empty
    /// cart value, not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store is unreachable.
    pub async fn get_cart(&self, owner_id: OwnerId) -> Result<Cart, CartError> {
        let items = self.carts.items(owner_id).await?;

        Ok(Cart { owner_id, items })
    }

    /// Add a product to the cart.
    ///
    /// Creates the cart lazily, snapshotting the product's display fields;
    /// if the product is already in the cart, its quantity is incremented
    /// by `quantity` (accumulate, not replace).
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`.
    /// Returns `CartError::ProductNotFound` if the product does not resolve.
    pub async fn add_item(
        &self,
        owner_id: OwnerId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        let quantity = Quantity::new(quantity)?;
        let product = self
            .resolve_product(product_id)
            .await?
            .ok_or(CartError::ProductNotFound(product_id))?;

        let items = self
            .carts
            .add_item(owner_id, &CartItem::snapshot(&product, quantity))
            .await?;

        Ok(Cart { owner_id, items })
    }

    /// Set an item's quantity to exactly `quantity` (absolute set, not
    /// delta).
    ///
    /// A quantity below one is rejected, never treated as removal; see
    /// [`Self::remove_item`] for that.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`.
    /// Returns `CartError::ItemNotFound` if no cart or no matching item exists.
    pub async fn update_quantity(
        &self,
        owner_id: OwnerId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<Cart, CartError> {
        let quantity = Quantity::new(quantity)?;

        let items = self
            .carts
            .set_quantity(owner_id, product_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ItemNotFound(product_id),
                other => CartError::Repository(other),
            })?;

        Ok(Cart { owner_id, items })
    }

    /// Remove an item from the cart. The cart itself persists, possibly
    /// with zero items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if no cart or no matching item
    /// exists; the cart is unchanged in that case.
    pub async fn remove_item(
        &self,
        owner_id: OwnerId,
        product_id: ProductId,
    ) -> Result<Cart, CartError> {
        let items = self
            .carts
            .remove_item(owner_id, product_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ItemNotFound(product_id),
                other => CartError::Repository(other),
            })?;

        Ok(Cart { owner_id, items })
    }

    /// Re-resolve every line item's display fields from the catalog.
    ///
    /// Snapshots are never refreshed implicitly; this is the explicit
    /// counterpart. Items whose product has since left the catalog keep
    /// their last snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the owner has no cart.
    pub async fn refresh_snapshots(&self, owner_id: OwnerId) -> Result<Cart, CartError> {
        if !self.carts.exists(owner_id).await? {
            return Err(CartError::CartNotFound(owner_id));
        }

        let items = self.carts.items(owner_id).await?;

        // Read the catalog directly: going through the cache here would
        // just refresh one staleness from another.
        let mut fresh = Vec::with_capacity(items.len());
        for item in &items {
            if let Some(product) = self.products.get(item.product_id).await? {
                self.catalog.insert(product.id, product.clone()).await;
                fresh.push(product);
            }
        }

        let items = self
            .carts
            .refresh_snapshots(owner_id, &fresh)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::CartNotFound(owner_id),
                other => CartError::Repository(other),
            })?;

        Ok(Cart { owner_id, items })
    }

    /// Catalog lookup through the shared cache.
    async fn resolve_product(&self, id: ProductId) -> Result<Option<Product>, CartError> {
        if let Some(product) = self.catalog.get(&id).await {
            return Ok(Some(product));
        }

        let product = self.products.get(id).await?;
        if let Some(ref product) = product {
            self.catalog.insert(id, product.clone()).await;
        }

        Ok(product)
    }
}
