//! Encoded vault calls ("zap steps") for a downstream batch-call composer.
//!
//! Each step lists the tokens it moves together with an insertion index: the
//! byte offset in the call data where the composer may splice in a dynamic
//! amount. [`NO_INSERT`] marks calls without an amount argument.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::{
    abi::IStandardVault::{
        depositAllCall, depositBNBCall, depositCall, withdrawAllBNBCall,
        withdrawAllCall, withdrawBNBCall, withdrawCall,
    },
    entities::{Erc20Token, Token},
};

/// Insertion index of a token whose amount is not spliced into the call.
pub const NO_INSERT: i32 = -1;

/// Decides where, in the call data, the amount argument at `position` sits.
///
/// Owned by the batch composer, which rewrites the amount at that index.
pub trait InsertIndexPolicy {
    /// Insertion index of the argument at `position`.
    fn insert_index(&self, position: i32) -> i32;
}

/// Byte offset of a static ABI argument: the 4-byte selector followed by
/// 32-byte words.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalldataOffset;

impl InsertIndexPolicy for CalldataOffset {
    fn insert_index(&self, position: i32) -> i32 {
        4 + position * 32
    }
}

/// A token moved by a [`ZapStep`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZapToken {
    /// Token address, [`Address::ZERO`] for the native currency.
    pub token: Address,
    /// Where the amount of this token sits in the call data, or
    /// [`NO_INSERT`].
    pub index: i32,
}

/// A single encoded contract call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZapStep {
    /// Contract to call.
    pub target: Address,
    /// Native currency attached to the call, in wei.
    pub value: U256,
    /// ABI-encoded call data.
    pub data: Bytes,
    /// Tokens moved by the call.
    pub tokens: Vec<ZapToken>,
}

impl ZapStep {
    fn new<C: SolCall>(
        target: Address,
        value: U256,
        call: &C,
        token: ZapToken,
    ) -> Self {
        Self {
            target,
            value,
            data: call.abi_encode().into(),
            tokens: vec![token],
        }
    }
}

/// Address reported for `token` in a [`ZapToken`].
#[must_use]
pub fn zap_token_address(token: &Token) -> Address {
    token.address().unwrap_or(Address::ZERO)
}

/// Encodes a deposit of `amount` base units of `token` into `vault`.
///
/// * Native currency: `depositBNB()` with `amount` attached as value. The
///   whole attached value is deposited, so `all` makes no difference.
/// * ERC-20 and `all`: `depositAll()`.
/// * ERC-20: `deposit(amount)`.
#[must_use]
pub fn deposit_step(
    vault: Address,
    token: &Token,
    amount: U256,
    all: bool,
    policy: &impl InsertIndexPolicy,
) -> ZapStep {
    let address = zap_token_address(token);
    match token {
        Token::Native(_) => ZapStep::new(
            vault,
            amount,
            &depositBNBCall {},
            ZapToken { token: address, index: NO_INSERT },
        ),
        Token::Erc20(_) if all => ZapStep::new(
            vault,
            U256::ZERO,
            &depositAllCall {},
            ZapToken { token: address, index: NO_INSERT },
        ),
        Token::Erc20(_) => ZapStep::new(
            vault,
            U256::ZERO,
            &depositCall { _amount: amount },
            ZapToken { token: address, index: policy.insert_index(0) },
        ),
    }
}

/// Encodes a withdrawal of `shares` base units of `share_token` from
/// `vault`, paying out in `deposit_token`.
///
/// | deposit token | `all`  | call               |
/// |---------------|--------|--------------------|
/// | native        | yes    | `withdrawAllBNB()` |
/// | native        | no     | `withdrawBNB(shares)` |
/// | ERC-20        | yes    | `withdrawAll()`    |
/// | ERC-20        | no     | `withdraw(shares)` |
#[must_use]
pub fn withdraw_step(
    vault: Address,
    deposit_token: &Token,
    share_token: &Erc20Token,
    shares: U256,
    all: bool,
    policy: &impl InsertIndexPolicy,
) -> ZapStep {
    let whole = ZapToken { token: share_token.address, index: NO_INSERT };
    let exact = ZapToken {
        token: share_token.address,
        index: policy.insert_index(0),
    };

    match (deposit_token, all) {
        (Token::Native(_), true) => {
            ZapStep::new(vault, U256::ZERO, &withdrawAllBNBCall {}, whole)
        }
        (Token::Native(_), false) => ZapStep::new(
            vault,
            U256::ZERO,
            &withdrawBNBCall { _shares: shares },
            exact,
        ),
        (Token::Erc20(_), true) => {
            ZapStep::new(vault, U256::ZERO, &withdrawAllCall {}, whole)
        }
        (Token::Erc20(_), false) => ZapStep::new(
            vault,
            U256::ZERO,
            &withdrawCall { _shares: shares },
            exact,
        ),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, uint, Address, U256};
    use alloy_sol_types::SolInterface;

    use super::{
        deposit_step, withdraw_step, CalldataOffset, InsertIndexPolicy,
        ZapStep, NO_INSERT,
    };
    use crate::{
        abi::IStandardVault::IStandardVaultCalls,
        entities::{ChainId, Erc20Token, NativeToken, Token},
    };

    const VAULT: Address = address!("97e5d50Fe0632A95b9cf1853E744E02f7D816677");
    const CAKE: Address = address!("0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82");
    const AMOUNT: U256 = uint!(100_000_000_000_000_000_000_U256);

    fn cake() -> Token {
        Token::Erc20(Erc20Token {
            chain_id: ChainId::from("bsc"),
            address: CAKE,
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

    fn share_token() -> Erc20Token {
        Erc20Token {
            chain_id: ChainId::from("bsc"),
            address: VAULT,
            symbol: "mooCAKE".to_string(),
            decimals: 18,
        }
    }

    fn decode(step: &ZapStep) -> IStandardVaultCalls {
        IStandardVaultCalls::abi_decode(&step.data)
            .expect("should decode vault call")
    }

    #[test]
    fn calldata_offset_skips_selector() {
        assert_eq!(CalldataOffset.insert_index(0), 4);
        assert_eq!(CalldataOffset.insert_index(1), 36);
    }

    #[test]
    fn erc20_deposit_encodes_amount() {
        let step = deposit_step(VAULT, &cake(), AMOUNT, false, &CalldataOffset);

        assert_eq!(step.target, VAULT);
        assert_eq!(step.value, U256::ZERO);
        assert_eq!(step.tokens.len(), 1);
        assert_eq!(step.tokens[0].token, CAKE);
        assert_eq!(step.tokens[0].index, 4);
        let IStandardVaultCalls::deposit(call) = decode(&step) else {
            panic!("should encode `deposit`");
        };
        assert_eq!(call._amount, AMOUNT);
    }

    #[test]
    fn erc20_deposit_all_has_no_arguments() {
        let step = deposit_step(VAULT, &cake(), AMOUNT, true, &CalldataOffset);

        assert_eq!(step.data.len(), 4);
        assert_eq!(step.value, U256::ZERO);
        assert_eq!(step.tokens[0].index, NO_INSERT);
        assert!(matches!(decode(&step), IStandardVaultCalls::depositAll(_)));
    }

    #[test]
    fn native_deposit_attaches_value() {
        for all in [false, true] {
            let step =
                deposit_step(VAULT, &bnb(), AMOUNT, all, &CalldataOffset);

            assert_eq!(step.value, AMOUNT);
            assert_eq!(step.data.len(), 4);
            assert_eq!(step.tokens.len(), 1);
            assert_eq!(step.tokens[0].token, Address::ZERO);
            assert_eq!(step.tokens[0].index, NO_INSERT);
            assert!(matches!(
                decode(&step),
                IStandardVaultCalls::depositBNB(_)
            ));
        }
    }

    #[test]
    fn withdraw_branches_recover_function() {
        let shares = uint!(5_U256);
        let cases = [
            (bnb(), true, "withdrawAllBNB"),
            (bnb(), false, "withdrawBNB"),
            (cake(), true, "withdrawAll"),
            (cake(), false, "withdraw"),
        ];

        for (deposit_token, all, expected) in cases {
            let step = withdraw_step(
                VAULT,
                &deposit_token,
                &share_token(),
                shares,
                all,
                &CalldataOffset,
            );

            assert_eq!(step.value, U256::ZERO);
            assert_eq!(step.tokens[0].token, VAULT);
            let name = match decode(&step) {
                IStandardVaultCalls::withdrawAllBNB(_) => "withdrawAllBNB",
                IStandardVaultCalls::withdrawBNB(call) => {
                    assert_eq!(call._shares, shares);
                    "withdrawBNB"
                }
                IStandardVaultCalls::withdrawAll(_) => "withdrawAll",
                IStandardVaultCalls::withdraw(call) => {
                    assert_eq!(call._shares, shares);
                    "withdraw"
                }
                _ => panic!("should encode a withdraw function"),
            };
            assert_eq!(name, expected);

            if all {
                assert_eq!(step.data.len(), 4);
                assert_eq!(step.tokens[0].index, NO_INSERT);
            } else {
                assert_eq!(step.data.len(), 4 + 32);
                assert_eq!(step.tokens[0].index, 4);
            }
        }
    }

    #[test]
    fn custom_policy_is_used_for_exact_calls() {
        struct Fixed;
        impl InsertIndexPolicy for Fixed {
            fn insert_index(&self, _position: i32) -> i32 {
                100
            }
        }

        let deposit = deposit_step(VAULT, &cake(), AMOUNT, false, &Fixed);
        assert_eq!(deposit.tokens[0].index, 100);

        let all = deposit_step(VAULT, &cake(), AMOUNT, true, &Fixed);
        assert_eq!(all.tokens[0].index, NO_INSERT);
    }
}
