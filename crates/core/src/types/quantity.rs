//! Cart line quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing a [`Quantity`] from a non-positive value.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("quantity must be a positive integer (got {0})")]
pub struct QuantityError(pub i32);

/// A cart line quantity.
///
/// Always a positive integer: a quantity of zero (or less) is never stored —
/// callers that want an item gone remove it explicitly. Constructing a
/// `Quantity` is the validation; code holding one can rely on the invariant.
///
/// ## Examples
///
/// ```
/// use heartwood_core::Quantity;
///
/// assert_eq!(Quantity::new(3).unwrap().get(), 3);
/// assert!(Quantity::new(0).is_err());
/// assert!(Quantity::new(-2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// The smallest valid quantity.
    pub const ONE: Self = Self(1);

    /// Create a `Quantity` from an integer.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError`] if `value < 1`.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value >= 1 {
            Ok(Self(value))
        } else {
            Err(QuantityError(value))
        }
    }

    /// Get the underlying integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(q: Quantity) -> Self {
        q.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Quantity {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <i32 as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <i32 as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Quantity {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let n = <i32 as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::new(n)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Quantity {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i32 as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_accepts_positive() {
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
        assert_eq!(Quantity::new(500).unwrap().get(), 500);
    }

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError(0)));
        assert_eq!(Quantity::new(-3), Err(QuantityError(-3)));
    }

    #[test]
    fn test_try_from() {
        let q: Quantity = 2i32.try_into().unwrap();
        assert_eq!(q, Quantity::new(2).unwrap());
        assert!(Quantity::try_from(0).is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let q = Quantity::new(7).unwrap();
        assert_eq!(serde_json::to_string(&q).unwrap(), "7");

        let back: Quantity = serde_json::from_str("7").unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn test_deserialize_rejects_zero() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            QuantityError(0).to_string(),
            "quantity must be a positive integer (got 0)"
        );
    }
}
