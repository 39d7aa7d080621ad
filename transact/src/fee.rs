//! Deposit and withdrawal fees.
//!
//! Fees always round toward negative infinity so a quote never shows the
//! user more than the vault contract will credit.

use alloy_primitives::U256;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{
    utils::{math::pow10, Math, Rounding},
    Error, Result,
};

/// Computes the fee charged on `amount` for a `fee` fraction, truncated to
/// `decimals` places.
///
/// A missing, zero or negative fee yields exactly zero.
///
/// # Errors
///
/// If `amount * fee` overflows a [`Decimal`], then the error
/// [`Error::AmountOverflow`] is returned.
pub fn compute_fee(
    amount: Decimal,
    fee: Option<Decimal>,
    decimals: u8,
) -> Result<Decimal> {
    let Some(fee) = fee.filter(|fee| fee.is_sign_positive() && !fee.is_zero())
    else {
        return Ok(Decimal::ZERO);
    };

    let raw = amount.checked_mul(fee).ok_or_else(|| {
        Error::AmountOverflow(format!("fee of {fee} on {amount}"))
    })?;
    Ok(raw.round_dp_with_strategy(
        u32::from(decimals),
        RoundingStrategy::ToNegativeInfinity,
    ))
}

/// Computes the fee charged on `wei` base units for a `fee` fraction,
/// rounded down to a whole base unit.
///
/// # Errors
///
/// If the fee fraction has more precision than [`U256`] can scale, then the
/// error [`Error::AmountOverflow`] is returned.
pub fn compute_fee_wei(wei: U256, fee: Option<Decimal>) -> Result<U256> {
    let Some(fee) = fee.filter(|fee| fee.is_sign_positive() && !fee.is_zero())
    else {
        return Ok(U256::ZERO);
    };

    let overflow = || Error::AmountOverflow(format!("fee of {fee} on {wei}"));
    let numerator = U256::from(fee.mantissa().unsigned_abs());
    let denominator = pow10(fee.scale()).ok_or_else(overflow)?;
    wei.checked_mul_div(numerator, denominator, Rounding::Floor)
        .ok_or_else(overflow)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{
        private::proptest::{prop_assert, prop_assert_eq, proptest},
        uint, U256,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{compute_fee, compute_fee_wei};

    #[test]
    fn zero_or_missing_fee_is_zero() {
        assert_eq!(compute_fee(dec!(100), None, 18).unwrap(), Decimal::ZERO);
        assert_eq!(
            compute_fee(dec!(100), Some(Decimal::ZERO), 18).unwrap(),
            Decimal::ZERO
        );
        assert_eq!(
            compute_fee(dec!(100), Some(dec!(-0.01)), 18).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn fee_on_hundred_tokens() {
        let fee = compute_fee(dec!(100), Some(dec!(0.001)), 18).unwrap();
        assert_eq!(fee, dec!(0.1));
        assert_eq!(dec!(100) - fee, dec!(99.9));
    }

    #[test]
    fn fee_rounds_toward_negative_infinity() {
        // 0.123456789 * 0.005 = 0.000617283945
        let fee = compute_fee(dec!(0.123456789), Some(dec!(0.005)), 6).unwrap();
        assert_eq!(fee, dec!(0.000617));

        // Never rounds up, even when the next digit is 9.
        let fee = compute_fee(dec!(0.0019999), Some(dec!(0.5)), 6).unwrap();
        assert_eq!(fee, dec!(0.000999));
    }

    #[test]
    fn fee_is_floor_of_product() {
        proptest!(|(
            units in 1u64..u64::MAX,
            bps in 1u32..10_000u32,
            decimals in 0u8..=18u8,
        )| {
            let amount = Decimal::new(i64::try_from(units >> 1).unwrap(), 6);
            let fraction = Decimal::new(i64::from(bps), 4);
            let fee = compute_fee(amount, Some(fraction), decimals).unwrap();

            let exact = amount * fraction;
            prop_assert!(fee <= exact);
            prop_assert!(exact - fee < Decimal::new(1, u32::from(decimals)));
            prop_assert_eq!(fee.round_dp(u32::from(decimals)), fee);
        });
    }

    #[test]
    fn fee_wei_floors() {
        assert_eq!(
            compute_fee_wei(uint!(1000_U256), None).unwrap(),
            U256::ZERO
        );
        assert_eq!(
            compute_fee_wei(uint!(1999_U256), Some(dec!(0.001))).unwrap(),
            uint!(1_U256)
        );
        assert_eq!(
            compute_fee_wei(
                uint!(100_000_000_000_000_000_000_U256),
                Some(dec!(0.001))
            )
            .unwrap(),
            uint!(100_000_000_000_000_000_U256)
        );
    }
}
