//! Business-logic services.
//!
//! Each service owns the validation and sequencing for one area and talks
//! to the repositories in [`crate::db`]; route handlers stay thin.

pub mod auth;
pub mod cart;
pub mod order;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
pub use order::{NewOrderItem, OrderError, OrderService};
