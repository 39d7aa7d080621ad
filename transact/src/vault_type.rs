//! Transact implementation of standard vaults.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{
        Erc20Token, InputTokenAmount, Token, TokenAddress, TokenAmount,
        VaultStandard,
    },
    fee::compute_fee,
    options::{StandardVaultOption, TransactMode, STANDARD_VAULT_TYPE},
    oracle::SharePriceOracle,
    quote::{
        build_deposit_quote, build_withdraw_quote, only_input_of,
        only_one_input, Quote,
    },
    state::StateAccessor,
    step::{
        confirm_message, Step, StepExtraInfo, StepKind, Translate,
        WalletAction,
    },
    utils::{math::pow10, to_wei, units::MAX_DECIMALS, Math, Rounding},
    withdraw::WithdrawalCalculator,
    zap::{
        deposit_step, withdraw_step, CalldataOffset, InsertIndexPolicy,
        ZapStep,
    },
    Error, Result,
};

/// An executable deposit or withdrawal: the amounts moved and the encoded
/// call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZapResponse {
    /// What the user supplies.
    pub inputs: Vec<InputTokenAmount>,
    /// What the user is expected to receive.
    pub outputs: Vec<TokenAmount>,
    /// What the user receives at worst. Standard vault calls carry no
    /// slippage tolerance, so this equals `outputs`.
    pub min_outputs: Vec<TokenAmount>,
    /// The encoded vault call.
    pub zap: ZapStep,
}

/// Response of [`StandardVaultType::fetch_zap_deposit`].
pub type VaultDepositResponse = ZapResponse;
/// Response of [`StandardVaultType::fetch_zap_withdraw`].
pub type VaultWithdrawResponse = ZapResponse;

/// Quotes and builds deposits and withdrawals for one standard vault.
///
/// The engine holds no mutable state. Every operation pulls one snapshot
/// from the [`StateAccessor`], so concurrent calls are independent.
#[derive(Debug)]
pub struct StandardVaultType<S, O, W, I = CalldataOffset> {
    vault: VaultStandard,
    deposit_token: Token,
    share_token: Erc20Token,
    state: S,
    oracle: O,
    withdrawals: W,
    insert_index: I,
}

impl<S, O, W> StandardVaultType<S, O, W>
where
    S: StateAccessor,
    O: SharePriceOracle,
    W: WithdrawalCalculator,
{
    /// Creates the engine for `vault`, using [`CalldataOffset`] insertion
    /// indexes.
    ///
    /// # Errors
    ///
    /// See [`StandardVaultType::with_insert_index_policy`].
    pub fn new(
        vault: VaultStandard,
        state: S,
        oracle: O,
        withdrawals: W,
    ) -> Result<Self> {
        Self::with_insert_index_policy(
            vault,
            state,
            oracle,
            withdrawals,
            CalldataOffset,
        )
    }
}

impl<S, O, W, I> StandardVaultType<S, O, W, I>
where
    S: StateAccessor,
    O: SharePriceOracle,
    W: WithdrawalCalculator,
    I: InsertIndexPolicy,
{
    /// Creates the engine for `vault` with a custom insertion index policy.
    ///
    /// Resolves the deposit and share tokens from the current state.
    ///
    /// # Errors
    ///
    /// If `vault` is not a standard vault, one of its tokens is unknown,
    /// the share token is not an ERC-20 token, or a token has more than
    /// [`MAX_DECIMALS`] decimals, then the error [`Error::Configuration`] is
    /// returned.
    pub fn with_insert_index_policy(
        vault: VaultStandard,
        state: S,
        oracle: O,
        withdrawals: W,
        insert_index: I,
    ) -> Result<Self> {
        if !vault.is_standard() {
            return Err(Error::Configuration(format!(
                "vault {} is not a standard vault",
                vault.id
            )));
        }

        let snapshot = state.snapshot();
        let deposit_token = snapshot
            .token_by_address(&vault.chain_id, vault.deposit_token_address)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "unknown deposit token {} of vault {}",
                    vault.deposit_token_address, vault.id
                ))
            })?;

        let share_token = match snapshot.token_by_address(
            &vault.chain_id,
            TokenAddress::Contract(vault.contract_address),
        ) {
            Some(Token::Erc20(token)) => token,
            Some(Token::Native(_)) => {
                return Err(Error::Configuration(format!(
                    "share token of vault {} is not an ERC-20 token",
                    vault.id
                )))
            }
            None => {
                return Err(Error::Configuration(format!(
                    "unknown share token {} of vault {}",
                    vault.contract_address, vault.id
                )))
            }
        };

        for (role, decimals) in [
            ("deposit", deposit_token.decimals()),
            ("share", share_token.decimals),
        ] {
            if decimals > MAX_DECIMALS {
                return Err(Error::Configuration(format!(
                    "{role} token of vault {} has {decimals} decimals, \
                     at most {MAX_DECIMALS} are supported",
                    vault.id
                )));
            }
        }

        Ok(Self {
            vault,
            deposit_token,
            share_token,
            state,
            oracle,
            withdrawals,
            insert_index,
        })
    }

    /// Identifier of this vault type.
    #[must_use]
    pub fn id(&self) -> &'static str {
        STANDARD_VAULT_TYPE
    }

    /// The vault.
    #[must_use]
    pub fn vault(&self) -> &VaultStandard {
        &self.vault
    }

    /// Token accepted on deposit and paid out on withdrawal.
    #[must_use]
    pub fn deposit_token(&self) -> &Token {
        &self.deposit_token
    }

    /// Share token issued by the vault.
    #[must_use]
    pub fn share_token(&self) -> &Erc20Token {
        &self.share_token
    }

    fn option(&self, mode: TransactMode) -> StandardVaultOption {
        StandardVaultOption::new(
            &self.vault.id,
            &self.vault.chain_id,
            vec![self.deposit_token.clone()],
            mode,
        )
    }

    fn deposit_fee(&self) -> Option<Decimal> {
        self.state
            .snapshot()
            .fees(&self.vault.id)
            .and_then(|fees| fees.deposit)
    }

    /// The deposit option: the deposit token in, the deposit token as the
    /// wanted output.
    #[must_use]
    pub fn fetch_deposit_option(&self) -> StandardVaultOption {
        self.option(TransactMode::Deposit)
    }

    /// Quotes a deposit of `inputs` for `option`.
    ///
    /// # Errors
    ///
    /// See [`build_deposit_quote`].
    pub fn fetch_deposit_quote(
        &self,
        inputs: &[InputTokenAmount],
        option: &StandardVaultOption,
    ) -> Result<Quote> {
        build_deposit_quote(
            inputs,
            option,
            self.vault.contract_address,
            &self.deposit_token,
            self.deposit_fee(),
        )
    }

    /// Builds the deposit call for `inputs`, reading the current share
    /// price once to compute the expected shares.
    ///
    /// The call deposits the full input amount. The vault charges the
    /// deposit fee itself, so only the expected shares account for it.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] or [`Error::TokenMismatch`] for an invalid
    ///   request, before any read.
    /// * [`Error::ChainCommunication`] if the share price read fails.
    /// * [`Error::InvalidSharePrice`] if the share price is zero.
    /// * [`Error::AmountOverflow`] if an amount does not fit.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(vault = %self.vault.id)
    )]
    pub async fn fetch_zap_deposit(
        &self,
        inputs: &[InputTokenAmount],
    ) -> Result<VaultDepositResponse> {
        let input = only_input_of(inputs, &self.deposit_token)?;
        let decimals = input.token.decimals();
        let amount_wei = input.to_wei()?;
        let fee = compute_fee(input.amount, self.deposit_fee(), decimals)?;
        let net_wei = to_wei(input.amount - fee, decimals)?;

        let ppfs = self.oracle.price_per_full_share(&self.vault).await?;
        if ppfs.is_zero() {
            return Err(Error::InvalidSharePrice(self.vault.id.clone()));
        }

        let overflow = || {
            Error::AmountOverflow(format!(
                "expected shares of vault {}",
                self.vault.id
            ))
        };
        let one_share =
            pow10(u32::from(self.share_token.decimals)).ok_or_else(overflow)?;
        let expected_shares = net_wei
            .checked_mul_div(one_share, ppfs, Rounding::Floor)
            .ok_or_else(overflow)?;
        tracing::debug!(%ppfs, %net_wei, %expected_shares, "computed deposit");

        let outputs = vec![TokenAmount::from_wei(
            Token::Erc20(self.share_token.clone()),
            expected_shares,
        )?];
        let zap = deposit_step(
            self.vault.contract_address,
            &input.token,
            amount_wei,
            input.max,
            &self.insert_index,
        );
        tracing::debug!(
            native = input.token.is_native(),
            all = input.max,
            "encoded deposit"
        );

        Ok(ZapResponse {
            inputs: inputs.to_vec(),
            outputs: outputs.clone(),
            min_outputs: outputs,
            zap,
        })
    }

    /// Builds the confirmation step of an accepted deposit `quote`.
    ///
    /// # Errors
    ///
    /// If the quote does not have exactly one input, then the error
    /// [`Error::InvalidInput`] is returned.
    pub fn fetch_deposit_step(
        &self,
        quote: &Quote,
        t: &impl Translate,
    ) -> Result<Step> {
        let input = only_one_input(&quote.inputs)?;
        Ok(Step {
            step: StepKind::Deposit,
            message: confirm_message(StepKind::Deposit, t),
            action: WalletAction::Deposit {
                vault_id: self.vault.id.clone(),
                amount: input.amount,
                max: input.max,
            },
            pending: false,
            extra_info: StepExtraInfo {
                zap: false,
                vault_id: quote.option.vault_id.clone(),
            },
        })
    }

    /// The withdraw option: the deposit token requested, the deposit token
    /// as the wanted output.
    #[must_use]
    pub fn fetch_withdraw_option(&self) -> StandardVaultOption {
        self.option(TransactMode::Withdraw)
    }

    /// Quotes a withdrawal of `inputs` for `option` from cached state.
    ///
    /// # Errors
    ///
    /// * See [`build_withdraw_quote`].
    /// * See [`WithdrawalCalculator::from_state`].
    pub fn fetch_withdraw_quote(
        &self,
        inputs: &[InputTokenAmount],
        option: &StandardVaultOption,
    ) -> Result<Quote> {
        let snapshot = self.state.snapshot();
        build_withdraw_quote(inputs, option, &self.deposit_token, |input| {
            self.withdrawals.from_state(
                input,
                &self.vault,
                &self.share_token,
                &snapshot,
            )
        })
    }

    /// Builds the withdrawal call for `inputs` from the live share price and
    /// the connected wallet's share balance.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidInput`] or [`Error::TokenMismatch`] for an invalid
    ///   request, and [`Error::WalletNotConnected`] without a wallet, before
    ///   any read.
    /// * See [`WithdrawalCalculator::from_chain`].
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(vault = %self.vault.id)
    )]
    pub async fn fetch_zap_withdraw(
        &self,
        inputs: &[InputTokenAmount],
    ) -> Result<VaultWithdrawResponse> {
        let input = only_input_of(inputs, &self.deposit_token)?;
        let snapshot = self.state.snapshot();
        let wallet =
            snapshot.wallet_address().ok_or(Error::WalletNotConnected)?;

        let withdrawal = self
            .withdrawals
            .from_chain(
                input,
                &self.vault,
                &self.share_token,
                &snapshot,
                wallet,
            )
            .await?;
        tracing::debug!(
            shares = %withdrawal.shares_to_redeem,
            out = %withdrawal.net_underlying_out,
            "computed withdrawal"
        );

        let share_amount = TokenAmount::from_wei(
            Token::Erc20(self.share_token.clone()),
            withdrawal.shares_to_redeem,
        )?;
        let inputs = vec![InputTokenAmount {
            token: share_amount.token,
            amount: share_amount.amount,
            max: input.max,
        }];
        let outputs = vec![TokenAmount::from_wei(
            self.deposit_token.clone(),
            withdrawal.net_underlying_out,
        )?];
        let zap = withdraw_step(
            self.vault.contract_address,
            &self.deposit_token,
            &self.share_token,
            withdrawal.shares_to_redeem,
            input.max,
            &self.insert_index,
        );
        tracing::debug!(
            native = self.deposit_token.is_native(),
            all = input.max,
            "encoded withdrawal"
        );

        Ok(ZapResponse {
            inputs,
            outputs: outputs.clone(),
            min_outputs: outputs,
            zap,
        })
    }

    /// Builds the confirmation step of an accepted withdrawal `quote`.
    ///
    /// # Errors
    ///
    /// If the quote does not have exactly one input, then the error
    /// [`Error::InvalidInput`] is returned.
    pub fn fetch_withdraw_step(
        &self,
        quote: &Quote,
        t: &impl Translate,
    ) -> Result<Step> {
        let input = only_one_input(&quote.inputs)?;
        Ok(Step {
            step: StepKind::Withdraw,
            message: confirm_message(StepKind::Withdraw, t),
            action: WalletAction::Withdraw {
                vault_id: self.vault.id.clone(),
                amount: input.amount,
                max: input.max,
            },
            pending: false,
            extra_info: StepExtraInfo {
                zap: false,
                vault_id: quote.option.vault_id.clone(),
            },
        })
    }
}
