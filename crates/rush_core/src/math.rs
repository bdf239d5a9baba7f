//! Fixed-point time utilities for deterministic planning.
//!
//! Elapsed time is tracked in fixed-point so that both timing models
//! (whole income rounds and continuous waiting) produce bit-identical
//! results on every platform. Floats are never used for search keys.

use fixed::types::I32F32;

/// Fixed-point number type for elapsed time.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Integer division rounding towards positive infinity.
///
/// `divisor` must be non-zero.
#[inline]
#[must_use]
pub const fn ceil_div(dividend: u64, divisor: u64) -> u64 {
    dividend / divisor + if dividend % divisor == 0 { 0 } else { 1 }
}

/// Format a time value with exactly two decimals, rounding half up.
///
/// Implemented with fixed-point arithmetic so the progress stream is
/// identical across platforms.
#[must_use]
pub fn format_hundredths(value: Fixed) -> String {
    let negative = value < Fixed::ZERO;
    let magnitude = if negative { -value } else { value };
    let hundredths = magnitude
        .saturating_mul(Fixed::from_num(100))
        .saturating_add(Fixed::from_num(0.5))
        .to_num::<i64>();
    let sign = if negative && hundredths != 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", hundredths / 100, hundredths % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ceil_div() {
        assert_eq!(ceil_div(0, 40), 0);
        assert_eq!(ceil_div(1, 40), 1);
        assert_eq!(ceil_div(40, 40), 1);
        assert_eq!(ceil_div(41, 40), 2);
        assert_eq!(ceil_div(200, 40), 5);
    }

    #[test]
    fn test_format_whole_numbers() {
        assert_eq!(format_hundredths(Fixed::ZERO), "0.00");
        assert_eq!(format_hundredths(Fixed::from_num(7)), "7.00");
        assert_eq!(format_hundredths(Fixed::from_num(1234)), "1234.00");
    }

    #[test]
    fn test_format_fractions_round_half_up() {
        assert_eq!(format_hundredths(Fixed::from_num(1) / Fixed::from_num(3)), "0.33");
        assert_eq!(format_hundredths(Fixed::from_num(2) / Fixed::from_num(3)), "0.67");
        assert_eq!(format_hundredths(Fixed::from_num(1.125)), "1.13");
        assert_eq!(format_hundredths(Fixed::from_num(-1.5)), "-1.50");
    }

    #[test]
    fn test_fixed_determinism() {
        let a = Fixed::from_num(450) / Fixed::from_num(40);
        let b = Fixed::from_num(450) / Fixed::from_num(40);
        assert_eq!(a, b);
        assert_eq!(a, Fixed::from_num(11.25));
    }
}
