//! Full-precision integer math missing in `alloy_primitives`.
use alloy_primitives::{U256, U512};

/// Trait for full-precision multiply-then-divide on [`U256`].
pub trait Math: Sized {
    /// Calculates `self * y / denominator` with full precision, following
    /// the selected `rounding` direction.
    ///
    /// Returns [`None`] if `denominator` is zero or if the result does not
    /// fit into `Self`.
    ///
    /// # Arguments
    ///
    /// * `self` - first value to compute the result.
    /// * `y` - second value to compute the result.
    /// * `denominator` - denominator of the division.
    /// * `rounding` - rounding technique to use in calculation.
    #[must_use]
    fn checked_mul_div(
        self,
        y: Self,
        denominator: Self,
        rounding: Rounding,
    ) -> Option<Self>;
}

/// Rounding direction of a division.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rounding {
    /// Rounding toward negative infinity.
    Floor,
    /// Rounding toward positive infinity.
    Ceil,
}

impl Math for U256 {
    fn checked_mul_div(
        self,
        y: Self,
        denominator: Self,
        rounding: Rounding,
    ) -> Option<Self> {
        if denominator.is_zero() {
            return None;
        }

        // `U256` * `U256` always fits into `U512`.
        let prod = U512::from(self) * U512::from(y);
        let denominator = U512::from(denominator);

        let adjusted = match rounding {
            Rounding::Floor => prod,
            Rounding::Ceil => prod.checked_add(denominator - U512::ONE)?,
        };

        let result = adjusted / denominator;
        if result > U512::from(U256::MAX) {
            return None;
        }
        Some(U256::from(result))
    }
}

/// Returns `10^exp` as a [`U256`], or [`None`] when `exp` is greater than 77
/// and the power does not fit.
#[must_use]
pub fn pow10(exp: u32) -> Option<U256> {
    U256::from(10u8).checked_pow(U256::from(exp))
}
