//! HTTP route handlers for the Heartwood API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (verifies database)
//!
//! # Catalog
//! GET  /api/products                - Product listing, newest first
//! GET  /api/products/{id}           - Product detail
//!
//! # Auth
//! POST /api/auth/register           - Create account, returns token
//! POST /api/auth/login              - Login, returns token
//!
//! # Cart (bearer token required; owner must match the caller)
//! GET    /cart/{ownerId}            - The owner's cart (empty value if none)
//! POST   /cart                      - Add item (creates cart lazily)
//! PUT    /cart/{ownerId}/{productId}    - Set item quantity
//! DELETE /cart/{ownerId}/{productId}    - Remove item
//! POST   /cart/{ownerId}/refresh    - Re-snapshot display fields
//!
//! # Orders (bearer token required; owner must match the caller)
//! POST /orders                      - Checkout: create order, clear cart
//! GET  /orders/{ownerId}            - Order history, newest first
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(cart::add))
        .route("/{owner_id}", get(cart::show))
        .route("/{owner_id}/refresh", post(cart::refresh))
        .route(
            "/{owner_id}/{product_id}",
            put(cart::update).delete(cart::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create))
        .route("/{owner_id}", get(orders::index))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/products", product_routes())
        .nest("/api/auth", auth_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
}
