//! Amount type for donation values.
//!
//! This module provides the `Amount` type which wraps `Decimal`, always holds exactly two decimal
//! places, and handles parsing values that may or may not include a dollar sign and commas.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The number of decimal places every `Amount` is stored and displayed with.
const SCALE: u32 = 2;

/// Represents a donated dollar amount.
///
/// The value is rounded to two decimal places on construction, so `100`, `100.0` and `100.004`
/// all become `100.00`.
///
/// # Examples
///
/// ```
/// # use temple_donations::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,250.5").unwrap();
/// assert_eq!(amount.to_string(), "1250.50");
/// assert_eq!(amount.to_dollars(), "$1,250.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    value: Decimal,
}

impl Default for Amount {
    fn default() -> Self {
        Amount::ZERO
    }
}

impl Amount {
    pub const ZERO: Amount = Amount {
        value: Decimal::ZERO,
    };

    /// Creates a new Amount, rounding `value` to two decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut value = value.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero);
        value.rescale(SCALE);
        Self { value }
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value.is_sign_negative()
    }

    /// Formats the amount for people: a dollar sign and thousands separators, e.g. `$1,000.00`.
    pub fn to_dollars(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        format!(
            "{sign}${}",
            format_num::format_num!(",.2", self.value.abs().to_f64().unwrap_or_default())
        )
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(AmountErrorKind);

enum AmountErrorKind {
    Empty,
    Decimal(rust_decimal::Error),
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AmountErrorKind::Empty => f.write_str("Empty"),
            AmountErrorKind::Decimal(e) => Debug::fmt(e, f),
        }
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.0 {
            AmountErrorKind::Empty => f.write_str("amount is empty"),
            AmountErrorKind::Decimal(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.0 {
            AmountErrorKind::Empty => None,
            AmountErrorKind::Decimal(e) => Some(e),
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError(AmountErrorKind::Empty));
        }

        // "-$50.00", "$50.00" and "50.00" are all accepted
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            match after_minus.strip_prefix('$') {
                Some(after_dollar) => format!("-{after_dollar}"),
                None => trimmed.to_string(),
            }
        } else {
            trimmed.strip_prefix('$').unwrap_or(trimmed).to_string()
        };

        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas)
            .map_err(|e| AmountError(AmountErrorKind::Decimal(e)))?;
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
