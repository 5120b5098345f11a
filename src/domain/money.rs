//! Monetary types and the conversions the numeric solvers need.
//!
//! Prices and sizes stay in [`Decimal`] everywhere they are compared against
//! thresholds. Solvers work in `f64`; values coming back are snapped to
//! [`SOLVER_DP`] decimal places so float noise never leaks into reported legs.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// Price in `(0, 1)`: the cost of a claim paying 1 if the outcome resolves true.
pub type Price = Decimal;

/// Quantity of outcome tokens.
pub type Volume = Decimal;

/// Decimal places kept when converting solver output back to [`Decimal`].
pub const SOLVER_DP: u32 = 6;

/// Convert a decimal to `f64`, mapping unrepresentable values to zero.
#[must_use]
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Convert a solver value to a decimal rounded to [`SOLVER_DP`] places.
///
/// Non-finite input becomes zero.
#[must_use]
pub fn from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(SOLVER_DP).normalize())
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn solver_noise_is_snapped() {
        assert_eq!(from_f64(0.999_999_999_7), Decimal::ONE);
        assert_eq!(from_f64(0.500_000_000_2), dec!(0.5));
    }

    #[test]
    fn non_finite_values_become_zero() {
        assert_eq!(from_f64(f64::NAN), Decimal::ZERO);
        assert_eq!(from_f64(f64::INFINITY), Decimal::ZERO);
    }

    #[test]
    fn decimal_round_trips_through_f64() {
        assert!((to_f64(dec!(0.45)) - 0.45).abs() < 1e-12);
    }
}
