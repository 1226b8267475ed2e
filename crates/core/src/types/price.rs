//! Type-safe product price.
//!
//! Prices are stored as `NUMERIC(12, 2)` and travel over JSON as decimal
//! strings (`"12.50"`), so no floating point rounding is ever involved.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Zero or negative amount.
    #[error("price must be greater than 0")]
    NotPositive,
    /// More than two fractional digits.
    #[error("price must have at most 2 decimal places")]
    TooPrecise,
    /// Larger than a `NUMERIC(12, 2)` column holds.
    #[error("price must be at most 9999999999.99")]
    TooLarge,
    /// Input could not be read as a decimal number.
    #[error("price must be a number")]
    Malformed,
}

/// A strictly positive price in the store's currency.
///
/// ```
/// use rust_decimal::Decimal;
/// use storeadmin_core::Price;
///
/// assert!(Price::new(Decimal::new(1250, 2)).is_ok());
/// assert!(Price::new(Decimal::ZERO).is_err());
/// assert!(Price::new(Decimal::new(-5, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Largest storable amount.
    pub const MAX: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

    /// Validate an amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not strictly positive, has more
    /// than two decimal places or exceeds [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if amount > Self::MAX {
            return Err(PriceError::TooLarge);
        }
        if amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        Ok(Self(amount))
    }

    /// Parse a price typed into a form field (`"12.5"`, `" 3 "`).
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Malformed`] for non-numeric input, otherwise the
    /// same errors as [`Price::new`].
    pub fn parse(raw: &str) -> Result<Self, PriceError> {
        let amount: Decimal = raw.trim().parse().map_err(|_| PriceError::Malformed)?;
        Self::new(amount)
    }

    /// The validated amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display in USD (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format_usd(self.0)
    }
}

/// Format any decimal amount as USD with two decimal places.
#[must_use]
pub fn format_usd(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // CHECK (price > 0) guards the column, so this only fails on corruption
        Ok(Self::new(amount)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(Price::new(Decimal::ZERO), Err(PriceError::NotPositive));
        assert_eq!(
            Price::new(Decimal::new(-5, 0)),
            Err(PriceError::NotPositive)
        );
    }

    #[test]
    fn test_rejects_sub_cent_amounts() {
        assert_eq!(
            Price::new(Decimal::new(1001, 3)),
            Err(PriceError::TooPrecise)
        );
        // trailing zeros are fine
        assert!(Price::new(Decimal::new(1000, 3)).is_ok());
    }

    #[test]
    fn test_rejects_amounts_beyond_column() {
        assert_eq!(Price::MAX.to_string(), "9999999999.99");
        assert!(Price::parse("9999999999.99").is_ok());
        assert_eq!(Price::parse("10000000000"), Err(PriceError::TooLarge));
        assert_eq!(
            Price::parse("79228162514264337593543950335"),
            Err(PriceError::TooLarge)
        );
    }

    #[test]
    fn test_parse_form_input() {
        assert_eq!(Price::parse(" 12.5 ").unwrap().to_string(), "12.50");
        assert_eq!(Price::parse("abc"), Err(PriceError::Malformed));
        assert_eq!(Price::parse(""), Err(PriceError::Malformed));
    }

    #[test]
    fn test_display_usd() {
        let price = Price::parse("1234.5").unwrap();
        assert_eq!(price.display(), "$1234.50");
        assert_eq!(format_usd(Decimal::ZERO), "$0.00");
    }

    #[test]
    fn test_serde_accepts_numbers_and_strings() {
        let from_str: Price = serde_json::from_str("\"9.99\"").unwrap();
        let from_num: Price = serde_json::from_str("9.99").unwrap();
        assert_eq!(from_str, from_num);
        assert!(serde_json::from_str::<Price>("-5").is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let price = Price::parse("9.99").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "\"9.99\"");
    }
}
