//! Conversions between human units ([`Decimal`]) and integer base units
//! ([`U256`], "wei").
//!
//! Amounts are kept in human units everywhere except at the encoding
//! boundary, where they are converted with [`to_wei`] and back with
//! [`from_wei`].

use alloy_primitives::U256;
use rust_decimal::Decimal;

use super::math::pow10;
use crate::{Error, Result};

/// Largest decimal precision an amount can be displayed with.
pub const MAX_DECIMALS: u8 = 28;

/// Converts a human-unit `amount` into base units of a token with
/// `decimals` precision. Digits beyond `decimals` are truncated.
///
/// # Errors
///
/// * [`Error::InvalidInput`] if `amount` is negative.
/// * [`Error::AmountOverflow`] if the result does not fit into [`U256`].
pub fn to_wei(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::InvalidInput(format!(
            "negative amount {amount}"
        )));
    }

    let mantissa = U256::from(amount.mantissa().unsigned_abs());
    let scale = amount.scale();
    let decimals = u32::from(decimals);
    let overflow =
        || Error::AmountOverflow(format!("{amount} at {decimals} decimals"));

    if scale <= decimals {
        let factor = pow10(decimals - scale).ok_or_else(overflow)?;
        mantissa.checked_mul(factor).ok_or_else(overflow)
    } else {
        let divisor = pow10(scale - decimals).ok_or_else(overflow)?;
        Ok(mantissa / divisor)
    }
}

/// Converts base units of a token with `decimals` precision into a
/// human-unit amount.
///
/// # Errors
///
/// * [`Error::AmountOverflow`] if `decimals` exceeds [`MAX_DECIMALS`] or the
///   value has more significant digits than a [`Decimal`] can hold.
pub fn from_wei(wei: U256, decimals: u8) -> Result<Decimal> {
    let overflow = || Error::AmountOverflow(format!("{wei} wei"));
    let value = u128::try_from(wei)
        .ok()
        .and_then(|value| i128::try_from(value).ok())
        .ok_or_else(overflow)?;

    if decimals > MAX_DECIMALS {
        return Err(overflow());
    }

    Decimal::try_from_i128_with_scale(value, u32::from(decimals))
        .map(|amount| amount.normalize())
        .map_err(|_| overflow())
}
