//! Domain types for the Heartwood API.
//!
//! These are validated domain objects, separate from the JSON DTOs defined
//! beside the route handlers that expose them.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{Order, OrderItem};
pub use product::Product;
pub use user::{CurrentUser, User};
