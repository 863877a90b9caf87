//! Conversion between major-unit decimal amounts and integer minor units.
//!
//! Amounts are always parsed from their textual form into a [`Decimal`], never
//! through a binary float, so `19.99` becomes exactly `1999` minor units.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

use crate::error::DomainError;

/// Minor units (kobo, cents) per major unit.
const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Number of fractional digits carried by a minor unit.
const MINOR_UNIT_SCALE: u32 = 2;

/// Converts a positive major-unit amount into integer minor units.
///
/// The scaled value is rounded half away from zero before truncation.
pub fn to_minor_units(decimal: Decimal) -> Result<i64, DomainError> {
    if decimal <= Decimal::ZERO {
        return Err(DomainError::InvalidAmount(format!(
            "{} is not greater than zero",
            decimal
        )));
    }

    let minor = decimal
        .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.to_i64())
        .ok_or_else(|| DomainError::InvalidAmount(format!("{} is too large", decimal)))?;

    if minor <= 0 {
        return Err(DomainError::InvalidAmount(format!(
            "{} is smaller than one minor unit",
            decimal
        )));
    }

    Ok(minor)
}

/// Converts integer minor units back into a major-unit decimal.
pub fn to_decimal(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, MINOR_UNIT_SCALE)
}

/// A validated payment amount, held in both representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentAmount {
    decimal: Decimal,
    minor_units: i64,
}

impl PaymentAmount {
    /// Creates an amount from a major-unit decimal.
    pub fn from_decimal(decimal: Decimal) -> Result<Self, DomainError> {
        let minor_units = to_minor_units(decimal)?;
        Ok(Self {
            decimal,
            minor_units,
        })
    }

    /// Parses an amount the way clients send it: a JSON number or a numeric string.
    pub fn parse(value: &Value) -> Result<Self, DomainError> {
        match value {
            Value::Number(n) => n.to_string().parse(),
            Value::String(s) => s.parse(),
            other => Err(DomainError::InvalidAmount(format!(
                "expected a number, got {}",
                other
            ))),
        }
    }

    /// Returns the amount in major units.
    pub fn decimal(&self) -> Decimal {
        self.decimal
    }

    /// Returns the amount in minor units.
    pub fn minor_units(&self) -> i64 {
        self.minor_units
    }
}

impl FromStr for PaymentAmount {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let decimal = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| DomainError::InvalidAmount(format!("'{}' is not a number", raw)))?;
        Self::from_decimal(decimal)
    }
}

impl fmt::Display for PaymentAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", to_decimal(self.minor_units))
    }
}

/// Serde helper writing a [`Decimal`] as a plain JSON number (`19.99`, not `"19.99"`).
pub mod major_units {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer, de, ser};

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        // Going through the decimal text keeps the nearest f64, same as `minor / 100.0`.
        let float: f64 = value
            .normalize()
            .to_string()
            .parse()
            .map_err(ser::Error::custom)?;
        serializer.serialize_f64(float)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let float = f64::deserialize(deserializer)?;
        Decimal::from_str(&float.to_string())
            .or_else(|_| Decimal::from_scientific(&float.to_string()))
            .map_err(de::Error::custom)
    }
}
