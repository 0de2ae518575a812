//! Nominal type
//!
//! Domain primitive for transaction amounts with business rule validation.
//! All amounts are validated at construction time, ensuring invalid values
//! cannot exist in the system.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum representable amount (the NUMERIC(15,2) column ceiling)
const MAX_NOMINAL: &str = "10000000000000";

/// Maximum decimal places (whole currency units and cents)
const MAX_SCALE: u32 = 2;

/// Nominal represents a validated transaction amount.
///
/// # Invariants
/// - Value is never negative (zero is allowed)
/// - At most 2 decimal places
/// - Fits in the ledger's NUMERIC(15,2) column
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use fintrack::domain::Nominal;
///
/// let nominal = Nominal::new(Decimal::new(50000000, 2)).unwrap();
/// assert_eq!(nominal.value(), Decimal::new(50000000, 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Nominal(Decimal);

/// Errors that can occur when creating a Nominal
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NominalError {
    #[error("Nominal must not be negative (got {0})")]
    Negative(Decimal),

    #[error("Nominal has too many decimal places (max {MAX_SCALE}, got {0})")]
    TooManyDecimals(u32),

    #[error("Nominal exceeds maximum allowed value")]
    Overflow,

    #[error("Invalid nominal format: {0}")]
    ParseError(String),
}

impl Nominal {
    /// Create a new Nominal with validation.
    ///
    /// # Errors
    /// - `NominalError::Negative` if value < 0
    /// - `NominalError::TooManyDecimals` if more than 2 decimal places
    /// - `NominalError::Overflow` if the value does not fit NUMERIC(15,2)
    pub fn new(value: Decimal) -> Result<Self, NominalError> {
        if value < Decimal::ZERO {
            return Err(NominalError::Negative(value));
        }

        if value.scale() > MAX_SCALE {
            return Err(NominalError::TooManyDecimals(value.scale()));
        }

        let max = Decimal::from_str(MAX_NOMINAL).expect("Invalid MAX_NOMINAL constant");
        if value >= max {
            return Err(NominalError::Overflow);
        }

        Ok(Self(value))
    }

    /// Zero nominal (a valid ledger amount, unlike a negative one).
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Get the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Nominal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl FromStr for Nominal {
    type Err = NominalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decimal =
            Decimal::from_str(s).map_err(|e| NominalError::ParseError(e.to_string()))?;
        Nominal::new(decimal)
    }
}

impl TryFrom<Decimal> for Nominal {
    type Error = NominalError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Nominal::new(value)
    }
}

impl From<Nominal> for Decimal {
    fn from(nominal: Nominal) -> Self {
        nominal.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_positive() {
        let nominal = Nominal::new(Decimal::new(100, 0));
        assert!(nominal.is_ok());
        assert_eq!(nominal.unwrap().value(), Decimal::new(100, 0));
    }

    #[test]
    fn test_nominal_zero_allowed() {
        let nominal = Nominal::new(Decimal::ZERO);
        assert!(nominal.is_ok());
        assert_eq!(Nominal::zero().value(), Decimal::ZERO);
    }

    #[test]
    fn test_nominal_negative_rejected() {
        let nominal = Nominal::new(Decimal::new(-100, 0));
        assert!(matches!(nominal, Err(NominalError::Negative(_))));
    }

    #[test]
    fn test_nominal_too_many_decimals() {
        // 0.123 has 3 decimal places
        let nominal = Nominal::new(Decimal::new(123, 3));
        assert!(matches!(nominal, Err(NominalError::TooManyDecimals(3))));
    }

    #[test]
    fn test_nominal_max_decimals_ok() {
        // 0.12 has 2 decimal places
        let nominal = Nominal::new(Decimal::new(12, 2));
        assert!(nominal.is_ok());
    }

    #[test]
    fn test_nominal_overflow() {
        let value = Decimal::from_str("10000000000000").unwrap();
        let nominal = Nominal::new(value);
        assert!(matches!(nominal, Err(NominalError::Overflow)));
    }

    #[test]
    fn test_nominal_max_column_value_ok() {
        // NUMERIC(15,2) tops out at 13 integer digits
        let value = Decimal::from_str("9999999999999.99").unwrap();
        let nominal = Nominal::new(value);
        assert!(nominal.is_ok());
    }

    #[test]
    fn test_nominal_from_str() {
        let nominal: Result<Nominal, _> = "500000.00".parse();
        assert!(nominal.is_ok());
        assert_eq!(nominal.unwrap().value(), Decimal::new(50000000, 2));
    }

    #[test]
    fn test_nominal_from_str_garbage() {
        let nominal: Result<Nominal, _> = "lima ratus".parse();
        assert!(matches!(nominal, Err(NominalError::ParseError(_))));
    }

    #[test]
    fn test_nominal_display_two_places() {
        let nominal = Nominal::new(Decimal::new(150000, 0)).unwrap();
        assert_eq!(nominal.to_string(), "150000.00");
    }
}
