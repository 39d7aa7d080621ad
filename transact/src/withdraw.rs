//! How many shares a withdrawal redeems and how much the user receives.
//!
//! Withdrawals are requested in deposit-token units but executed in shares.
//! The share count for an exact request rounds up, so redeeming it yields at
//! least the requested amount before fees, and is capped by the wallet's
//! balance when it is known. The received amount rounds down.

use alloy::providers::Provider;
use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    abi::IStandardVault,
    entities::{Erc20Token, InputTokenAmount, VaultStandard},
    fee::compute_fee_wei,
    state::StateSnapshot,
    utils::{math::pow10, Math, Rounding},
    Error, Result,
};

/// Outcome of a withdrawal, in base units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Withdrawal {
    /// Shares burned by the vault.
    pub shares_to_redeem: U256,
    /// Deposit tokens released by the burned shares, before fees.
    pub withdrawn: U256,
    /// Deposit tokens the user receives after the withdrawal fee.
    pub net_underlying_out: U256,
}

/// The wallet's position in a vault at the time of the computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SharePosition {
    /// Price per full share, see [`crate::oracle::SharePriceOracle`].
    pub price_per_full_share: U256,
    /// Share balance of the wallet, when known.
    pub share_balance: Option<U256>,
}

/// Computes a [`Withdrawal`] for `input` against `position`.
///
/// A `max` input redeems the whole known share balance. Without a known
/// balance it falls back to the requested amount.
///
/// # Errors
///
/// * [`Error::InvalidSharePrice`] if the share price is zero.
/// * [`Error::AmountOverflow`] if an intermediate value overflows.
pub fn compute_withdrawal(
    input: &InputTokenAmount,
    vault: &VaultStandard,
    share_token: &Erc20Token,
    position: SharePosition,
    withdraw_fee: Option<Decimal>,
) -> Result<Withdrawal> {
    let SharePosition { price_per_full_share: ppfs, share_balance } = position;
    if ppfs.is_zero() {
        return Err(Error::InvalidSharePrice(vault.id.clone()));
    }

    let overflow =
        || Error::AmountOverflow(format!("withdrawal from vault {}", vault.id));
    let one_share =
        pow10(u32::from(share_token.decimals)).ok_or_else(overflow)?;

    let shares_to_redeem = match (input.max, share_balance) {
        (true, Some(balance)) => balance,
        (_, balance) => {
            let requested = input.to_wei()?;
            let shares = requested
                .checked_mul_div(one_share, ppfs, Rounding::Ceil)
                .ok_or_else(overflow)?;
            balance.map_or(shares, |balance| shares.min(balance))
        }
    };

    let withdrawn = shares_to_redeem
        .checked_mul_div(ppfs, one_share, Rounding::Floor)
        .ok_or_else(overflow)?;
    let fee = compute_fee_wei(withdrawn, withdraw_fee)?;

    Ok(Withdrawal {
        shares_to_redeem,
        withdrawn,
        net_underlying_out: withdrawn - fee,
    })
}

/// Computes withdrawals for a vault, either from cached application state
/// or from the chain.
pub trait WithdrawalCalculator {
    /// Computes the withdrawal from the share price and balance cached in
    /// `state`. Performs no I/O.
    ///
    /// # Errors
    ///
    /// * [`Error::MissingState`] if `state` has no share price for the vault.
    /// * See [`compute_withdrawal`].
    fn from_state(
        &self,
        input: &InputTokenAmount,
        vault: &VaultStandard,
        share_token: &Erc20Token,
        state: &StateSnapshot,
    ) -> Result<Withdrawal> {
        let price_per_full_share =
            state.price_per_full_share(&vault.id).ok_or_else(|| {
                Error::MissingState(format!(
                    "price per full share of vault {}",
                    vault.id
                ))
            })?;
        let position = SharePosition {
            price_per_full_share,
            share_balance: state.share_balance(&vault.id),
        };
        let fee = state.fees(&vault.id).and_then(|fees| fees.withdraw);
        compute_withdrawal(input, vault, share_token, position, fee)
    }

    /// Computes the withdrawal from the live share price and the share
    /// balance of `wallet`, read in one batched call.
    ///
    /// # Errors
    ///
    /// * [`Error::ChainCommunication`] if the batched read fails.
    /// * See [`compute_withdrawal`].
    async fn from_chain(
        &self,
        input: &InputTokenAmount,
        vault: &VaultStandard,
        share_token: &Erc20Token,
        state: &StateSnapshot,
        wallet: Address,
    ) -> Result<Withdrawal>;
}

/// [`WithdrawalCalculator`] reading through an `alloy` provider, batching
/// its reads with Multicall3.
#[derive(Clone, Debug)]
pub struct StandardWithdrawalCalculator<P> {
    provider: P,
}

impl<P: Provider> StandardWithdrawalCalculator<P> {
    /// Creates a calculator reading through `provider`.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: Provider> WithdrawalCalculator for StandardWithdrawalCalculator<P> {
    async fn from_chain(
        &self,
        input: &InputTokenAmount,
        vault: &VaultStandard,
        share_token: &Erc20Token,
        state: &StateSnapshot,
        wallet: Address,
    ) -> Result<Withdrawal> {
        let contract =
            IStandardVault::new(vault.contract_address, &self.provider);
        let (price_per_full_share, share_balance) = self
            .provider
            .multicall()
            .add(contract.getPricePerFullShare())
            .add(contract.balanceOf(wallet))
            .aggregate()
            .await
            .map_err(Error::chain)?;

        tracing::debug!(
            vault = %vault.id,
            %wallet,
            ppfs = %price_per_full_share,
            shares = %share_balance,
            "read withdrawal position"
        );

        let position = SharePosition {
            price_per_full_share,
            share_balance: Some(share_balance),
        };
        let fee = state.fees(&vault.id).and_then(|fees| fees.withdraw);
        compute_withdrawal(input, vault, share_token, position, fee)
    }
}
