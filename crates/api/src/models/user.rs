//! User domain types.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use heartwood_core::{Email, UserId};

/// A registered shop user (domain type).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
    /// Set on every successful password login.
    pub last_login: Option<DateTime<Utc>>,
}

/// The user resolved from a bearer token on an authenticated request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
