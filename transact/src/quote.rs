//! Deposit and withdrawal quotes shown to the user before a transaction is
//! submitted.

use alloy_primitives::Address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Allowance, InputTokenAmount, Token, TokenAmount},
    fee::compute_fee,
    options::{create_quote_id, StandardVaultOption},
    withdraw::Withdrawal,
    Error, Result,
};

/// Preview of a deposit or withdrawal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Quote identifier, stable for identical requests.
    pub id: String,
    /// Strategy identifier of the option.
    pub strategy_id: String,
    /// Vault type identifier of the option.
    pub vault_type: String,
    /// Option the quote was computed for.
    pub option: StandardVaultOption,
    /// What the user supplies.
    pub inputs: Vec<InputTokenAmount>,
    /// What the user receives.
    pub outputs: Vec<TokenAmount>,
    /// Dust returned to the user. Always empty for standard vaults.
    pub returned: Vec<TokenAmount>,
    /// Approvals required before the transaction.
    pub allowances: Vec<Allowance>,
    /// Price impact as a fraction. Standard vault conversions are
    /// deterministic, so this is always zero.
    pub price_impact: Decimal,
}

impl Quote {
    fn new(
        option: &StandardVaultOption,
        inputs: &[InputTokenAmount],
        input: &InputTokenAmount,
        outputs: Vec<TokenAmount>,
        allowances: Vec<Allowance>,
    ) -> Self {
        let request = format!(
            "{}{}",
            input.amount.normalize(),
            if input.max { "-max" } else { "" }
        );
        Self {
            id: create_quote_id(&option.id, &request),
            strategy_id: option.strategy_id.clone(),
            vault_type: option.vault_type.clone(),
            option: option.clone(),
            inputs: inputs.to_vec(),
            outputs,
            returned: Vec::new(),
            allowances,
            price_impact: Decimal::ZERO,
        }
    }
}

/// Returns the single input of a request.
///
/// # Errors
///
/// If `inputs` does not hold exactly one entry, then the error
/// [`Error::InvalidInput`] is returned.
pub fn only_one_input(
    inputs: &[InputTokenAmount],
) -> Result<&InputTokenAmount> {
    match inputs {
        [input] => Ok(input),
        _ => Err(Error::InvalidInput(format!(
            "expected exactly 1 input, got {}",
            inputs.len()
        ))),
    }
}

/// Checks that `inputs` holds exactly one entry of `expected`.
///
/// # Errors
///
/// * [`Error::InvalidInput`] if there is not exactly one input.
/// * [`Error::TokenMismatch`] if the input token is not `expected`.
pub fn only_input_of<'a>(
    inputs: &'a [InputTokenAmount],
    expected: &Token,
) -> Result<&'a InputTokenAmount> {
    let input = only_one_input(inputs)?;
    if input.token != *expected {
        return Err(Error::TokenMismatch {
            expected: expected.clone(),
            actual: input.token.clone(),
        });
    }
    Ok(input)
}

/// Checks a quote request: exactly one input, a positive amount, and
/// `expected` as the token.
///
/// # Errors
///
/// * [`Error::InvalidInput`] if there is not exactly one input or its amount
///   is not positive.
/// * [`Error::TokenMismatch`] if the input token is not `expected`.
pub fn validate_quote_input<'a>(
    inputs: &'a [InputTokenAmount],
    expected: &Token,
) -> Result<&'a InputTokenAmount> {
    let input = only_one_input(inputs)?;
    if input.amount <= Decimal::ZERO {
        return Err(Error::InvalidInput(format!(
            "quote called with {} input amount",
            input.amount
        )));
    }
    only_input_of(inputs, expected)
}

/// Builds a deposit quote.
///
/// The deposit fee is deducted in the deposit token itself. Shares are only
/// computed when the call is built. ERC-20 inputs require an allowance of
/// the full input for the vault contract.
///
/// # Errors
///
/// * See [`validate_quote_input`].
/// * See [`compute_fee`].
pub fn build_deposit_quote(
    inputs: &[InputTokenAmount],
    option: &StandardVaultOption,
    vault_address: Address,
    deposit_token: &Token,
    deposit_fee: Option<Decimal>,
) -> Result<Quote> {
    let input = validate_quote_input(inputs, deposit_token)?;

    let fee = compute_fee(input.amount, deposit_fee, input.token.decimals())?;
    let output = TokenAmount::new(input.token.clone(), input.amount - fee);

    let allowances = match &input.token {
        Token::Native(_) => Vec::new(),
        Token::Erc20(_) => vec![Allowance {
            token: input.token.clone(),
            amount: input.amount,
            spender_address: vault_address,
        }],
    };

    Ok(Quote::new(option, inputs, input, vec![output], allowances))
}

/// Builds a withdrawal quote.
///
/// `withdrawal` is only invoked once the request is valid, and computes how
/// many shares are redeemed and what the user receives. Withdrawals need no
/// allowance since the vault burns the caller's own shares.
///
/// # Errors
///
/// * See [`validate_quote_input`].
/// * Any error returned by `withdrawal`.
pub fn build_withdraw_quote(
    inputs: &[InputTokenAmount],
    option: &StandardVaultOption,
    deposit_token: &Token,
    withdrawal: impl FnOnce(&InputTokenAmount) -> Result<Withdrawal>,
) -> Result<Quote> {
    let input = validate_quote_input(inputs, deposit_token)?;

    let Withdrawal { net_underlying_out, .. } = withdrawal(input)?;
    let output =
        TokenAmount::from_wei(input.token.clone(), net_underlying_out)?;

    Ok(Quote::new(option, inputs, input, vec![output], Vec::new()))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, uint, Address, U256};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::{build_deposit_quote, build_withdraw_quote, only_one_input};
    use crate::{
        entities::{ChainId, Erc20Token, InputTokenAmount, NativeToken, Token},
        options::{StandardVaultOption, TransactMode},
        withdraw::Withdrawal,
        Error,
    };

    const VAULT: Address = address!("97e5d50Fe0632A95b9cf1853E744E02f7D816677");
    const FEE: Option<Decimal> = Some(dec!(0.001));

    fn cake() -> Token {
        Token::Erc20(Erc20Token {
            chain_id: ChainId::from("bsc"),
            address: address!("0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82"),
            symbol: "CAKE".to_string(),
            decimals: 18,
        })
    }

    fn bnb() -> Token {
        Token::Native(NativeToken {
            chain_id: ChainId::from("bsc"),
            symbol: "BNB".to_string(),
            decimals: 18,
        })
    }

    fn option(token: &Token, mode: TransactMode) -> StandardVaultOption {
        StandardVaultOption::new(
            "cake-vault",
            &ChainId::from("bsc"),
            vec![token.clone()],
            mode,
        )
    }

    #[test]
    fn only_one_input_rejects_other_counts() {
        let err = only_one_input(&[]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let two = [
            InputTokenAmount::new(cake(), dec!(1)),
            InputTokenAmount::new(cake(), dec!(2)),
        ];
        let err = only_one_input(&two).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn deposit_quote_deducts_fee() {
        let inputs = [InputTokenAmount::new(cake(), dec!(100))];
        let option = option(&cake(), TransactMode::Deposit);
        let quote =
            build_deposit_quote(&inputs, &option, VAULT, &cake(), FEE).unwrap();

        assert_eq!(quote.outputs.len(), 1);
        assert_eq!(quote.outputs[0].token, cake());
        assert_eq!(quote.outputs[0].amount, dec!(99.9));
        assert_eq!(quote.allowances.len(), 1);
        assert_eq!(quote.allowances[0].token, cake());
        assert_eq!(quote.allowances[0].amount, dec!(100));
        assert_eq!(quote.allowances[0].spender_address, VAULT);
        assert_eq!(quote.price_impact, Decimal::ZERO);
        assert!(quote.returned.is_empty());
    }

    #[test]
    fn native_deposit_quote_needs_no_allowance() {
        let inputs = [InputTokenAmount::new(bnb(), dec!(1))];
        let option = option(&bnb(), TransactMode::Deposit);
        let quote =
            build_deposit_quote(&inputs, &option, VAULT, &bnb(), None).unwrap();

        assert!(quote.allowances.is_empty());
        assert_eq!(quote.outputs[0].amount, dec!(1));
    }

    #[test]
    fn deposit_quote_rejects_zero_amount() {
        let inputs = [InputTokenAmount::new(cake(), Decimal::ZERO)];
        let option = option(&cake(), TransactMode::Deposit);
        let err = build_deposit_quote(&inputs, &option, VAULT, &cake(), None)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn deposit_quote_rejects_other_token() {
        let inputs = [InputTokenAmount::new(bnb(), dec!(1))];
        let option = option(&cake(), TransactMode::Deposit);
        let err = build_deposit_quote(&inputs, &option, VAULT, &cake(), None)
            .unwrap_err();
        assert_eq!(
            err,
            Error::TokenMismatch { expected: cake(), actual: bnb() }
        );
    }

    #[test]
    fn withdraw_quote_packages_withdrawal() {
        let inputs = [InputTokenAmount::new(cake(), dec!(10))];
        let option = option(&cake(), TransactMode::Withdraw);
        let quote = build_withdraw_quote(&inputs, &option, &cake(), |input| {
            assert_eq!(input.amount, dec!(10));
            Ok(Withdrawal {
                shares_to_redeem: uint!(5_000_000_000_000_000_000_U256),
                withdrawn: uint!(10_000_000_000_000_000_000_U256),
                net_underlying_out: uint!(9_990_000_000_000_000_000_U256),
            })
        })
        .unwrap();

        assert_eq!(quote.outputs[0].token, cake());
        assert_eq!(quote.outputs[0].amount, dec!(9.99));
        assert!(quote.allowances.is_empty());
    }

    #[test]
    fn withdraw_quote_validates_before_computing() {
        let inputs = [InputTokenAmount::new(cake(), Decimal::ZERO)];
        let option = option(&cake(), TransactMode::Withdraw);
        let err = build_withdraw_quote(&inputs, &option, &cake(), |_| {
            panic!("should not compute withdrawal for an invalid request")
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let inputs = [InputTokenAmount::new(bnb(), dec!(1))];
        let err = build_withdraw_quote(&inputs, &option, &cake(), |_| {
            Ok(Withdrawal {
                shares_to_redeem: U256::ZERO,
                withdrawn: U256::ZERO,
                net_underlying_out: U256::ZERO,
            })
        })
        .unwrap_err();
        assert!(matches!(err, Error::TokenMismatch { .. }));
    }

    #[test]
    fn identical_requests_give_identical_quotes() {
        let inputs = [InputTokenAmount::new(cake(), dec!(100))];
        let option = option(&cake(), TransactMode::Deposit);
        let first =
            build_deposit_quote(&inputs, &option, VAULT, &cake(), FEE).unwrap();
        let second =
            build_deposit_quote(&inputs, &option, VAULT, &cake(), FEE).unwrap();
        assert_eq!(first, second);
    }
}
