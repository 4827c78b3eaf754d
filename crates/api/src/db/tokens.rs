//! Bearer token repository.
//!
//! Only token digests are stored; the raw value exists nowhere but the
//! response that issued it.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use heartwood_core::UserId;

use super::RepositoryError;
use crate::models::User;

/// Repository for bearer token storage and lookup.
pub struct TokenRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TokenRepository<'a> {
    /// Create a new token repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a token digest for a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO api_token (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token_hash)
            .bind(user_id)
            .bind(expires_at)
            .execute(self.pool)
            .await?;

        Ok(())
    }

    /// Resolve an unexpired token digest to its user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn user_for_token(&self, token_hash: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT u.id, u.name, u.email, u.created_at, u.last_login \
             FROM api_token t JOIN shop_user u ON u.id = t.user_id \
             WHERE t.token_hash = $1 AND t.expires_at > now()",
        )
        .bind(token_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }
}
