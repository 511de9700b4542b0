//! Lossless decimal numeric type backed by rust_decimal.
//!
//! Provides canonical parsing and formatting plus the token-unit and
//! rebasing-index arithmetic the planner relies on.

use rust_decimal::{Decimal as RustDecimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lossless decimal numeric type for balance and rate calculations.
///
/// Backed by rust_decimal to avoid floating-point drift.
/// Serializes to a JSON string so downstream consumers never lose precision.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::str")] RustDecimal);

impl Decimal {
    /// Create a Decimal from a RustDecimal.
    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s).map(Decimal)
    }

    /// Format the Decimal as a canonical string (no exponent notation).
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    /// Get the underlying RustDecimal.
    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    /// The additive identity (0).
    pub fn zero() -> Self {
        Decimal(RustDecimal::ZERO)
    }

    /// The multiplicative identity (1).
    pub fn one() -> Self {
        Decimal(RustDecimal::ONE)
    }

    /// Returns true if the value is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the value is > 0.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Division that reports a zero divisor instead of panicking.
    pub fn checked_div(&self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_div(rhs.0).map(Decimal)
    }

    /// Round to a whole unit, half away from zero. Matches the half-up
    /// rounding on-chain ray division uses.
    pub fn round_to_unit(&self) -> Decimal {
        Decimal(
            self.0
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// Convert a human-unit token amount into the token's smallest unit,
    /// truncating precision beyond `decimals`.
    pub fn to_base_units(&self, decimals: u32) -> Decimal {
        Decimal((self.0 * pow10(decimals)).trunc())
    }

    /// Convert a smallest-unit amount back into human units.
    pub fn from_base_units(&self, decimals: u32) -> Decimal {
        Decimal(self.0 / pow10(decimals))
    }

    /// Clamp negative values to zero.
    pub fn floor_zero(&self) -> Decimal {
        if self.0.is_sign_negative() {
            Decimal::zero()
        } else {
            *self
        }
    }
}

fn pow10(decimals: u32) -> RustDecimal {
    RustDecimal::from_i128_with_scale(10i128.pow(decimals), 0)
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

// Arithmetic operations
impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::ops::Mul for Decimal {
    type Output = Decimal;

    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl std::ops::Div for Decimal {
    type Output = Decimal;

    fn div(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 / rhs.0)
    }
}

impl std::ops::Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_decimal_parse_roundtrip() {
        let test_cases = vec![
            "123.456",
            "0.0001",
            "1000000",
            "-123.456",
            "0",
            "999999999.999999999",
        ];

        for s in test_cases {
            let decimal = Decimal::from_str_canonical(s).expect("parse failed");
            let formatted = decimal.to_canonical_string();
            let reparsed = Decimal::from_str_canonical(&formatted).expect("reparse failed");
            assert_eq!(decimal, reparsed, "roundtrip failed for {}", s);
        }
    }

    #[test]
    fn test_decimal_canonical_no_exponent() {
        let decimal = Decimal::from_str_canonical("123").expect("parse failed");
        let formatted = decimal.to_canonical_string();
        assert!(
            !formatted.contains('e'),
            "formatted string should not contain exponent"
        );
        assert_eq!(formatted, "123");
    }

    #[test]
    fn test_decimal_json_serializes_as_string() {
        let decimal = Decimal::from_str_canonical("123.456").unwrap();
        let json = serde_json::to_value(decimal).unwrap();
        assert!(json.is_string());
        assert_eq!(json.as_str().unwrap(), "123.456");
    }

    #[test]
    fn test_to_base_units_truncates() {
        let amount = Decimal::new(dec!(1.0000019));
        assert_eq!(amount.to_base_units(6), Decimal::new(dec!(1000001)));
    }

    #[test]
    fn test_base_unit_roundtrip() {
        let amount = Decimal::new(dec!(952.380952));
        let base = amount.to_base_units(6);
        assert_eq!(base, Decimal::new(dec!(952380952)));
        assert_eq!(base.from_base_units(6), amount);
    }

    #[test]
    fn test_round_to_unit_half_up() {
        assert_eq!(
            Decimal::new(dec!(2.5)).round_to_unit(),
            Decimal::new(dec!(3))
        );
        assert_eq!(
            Decimal::new(dec!(2.4999)).round_to_unit(),
            Decimal::new(dec!(2))
        );
    }

    #[test]
    fn test_checked_div_zero() {
        let a = Decimal::new(dec!(10));
        assert!(a.checked_div(Decimal::zero()).is_none());
        assert_eq!(
            a.checked_div(Decimal::new(dec!(4))),
            Some(Decimal::new(dec!(2.5)))
        );
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Decimal::new(dec!(-3)).floor_zero(), Decimal::zero());
        assert_eq!(
            Decimal::new(dec!(3)).floor_zero(),
            Decimal::new(dec!(3))
        );
    }

    #[test]
    fn test_decimal_arithmetic() {
        let a = Decimal::from_str_canonical("10.5").unwrap();
        let b = Decimal::from_str_canonical("2.5").unwrap();

        assert_eq!((a + b).to_canonical_string(), "13");
        assert_eq!((a - b).to_canonical_string(), "8");
        assert_eq!((a * b).to_canonical_string(), "26.25");
        assert_eq!((a / b).to_canonical_string(), "4.2");
    }

    #[test]
    fn test_decimal_ordering() {
        let a = Decimal::from_str_canonical("10").unwrap();
        let b = Decimal::from_str_canonical("20").unwrap();
        assert!(a < b);
        assert!(b > a);
        assert_eq!(a, a);
    }
}
