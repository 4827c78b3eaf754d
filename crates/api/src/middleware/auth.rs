//! Authentication extractor and ownership checks.
//!
//! Cart and order routes name an owner in the path or body; the extractor
//! resolves the caller from their bearer token, and [`ensure_owner`] rejects
//! calls where the two disagree. Without that check, any caller could
//! mutate any owner's cart.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use heartwood_core::OwnerId;

use crate::error::AppError;
use crate::models::CurrentUser;
use crate::services::AuthService;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let token = bearer_token(parts)
            .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

        let user = AuthService::new(state.pool()).authenticate(token).await?;

        Ok(Self(user))
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Check that the owner named by the request is the authenticated caller.
///
/// # Errors
///
/// Returns `AppError::Forbidden` on mismatch.
pub fn ensure_owner(user: &CurrentUser, owner_id: OwnerId) -> Result<(), AppError> {
    if user.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "owner does not match the authenticated user".to_owned(),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use axum::http::Request;
    use heartwood_core::{Email, UserId};

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/cart");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_extracts_value() {
        let parts = parts_with_auth(Some("Bearer abc123"));
        assert_eq!(bearer_token(&parts), Some("abc123"));
    }

    #[test]
    fn test_bearer_token_requires_scheme() {
        assert_eq!(bearer_token(&parts_with_auth(Some("abc123"))), None);
        assert_eq!(bearer_token(&parts_with_auth(Some("Basic abc123"))), None);
        assert_eq!(bearer_token(&parts_with_auth(None)), None);
    }

    #[test]
    fn test_ensure_owner() {
        let user = CurrentUser {
            id: UserId::generate(),
            name: "Test".to_owned(),
            email: Email::parse("test@example.com").unwrap(),
        };

        assert!(ensure_owner(&user, user.id).is_ok());
        assert!(matches!(
            ensure_owner(&user, UserId::generate()),
            Err(AppError::Forbidden(_))
        ));
    }
}
