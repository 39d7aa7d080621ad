//! Token amounts in human units.

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Token;
use crate::{
    utils::{from_wei, to_wei},
    Result,
};

/// An amount of a token, in human units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAmount {
    /// The token.
    pub token: Token,
    /// Amount in human units.
    pub amount: Decimal,
}

impl TokenAmount {
    /// Creates a new amount of `token`.
    #[must_use]
    pub fn new(token: Token, amount: Decimal) -> Self {
        Self { token, amount }
    }

    /// Creates an amount from base units of `token`.
    ///
    /// # Errors
    ///
    /// If the value cannot be represented in human units, then the error
    /// [`crate::Error::AmountOverflow`] is returned.
    pub fn from_wei(token: Token, wei: U256) -> Result<Self> {
        let amount = from_wei(wei, token.decimals())?;
        Ok(Self { token, amount })
    }

    /// The amount in base units of the token.
    ///
    /// # Errors
    ///
    /// See [`to_wei`].
    pub fn to_wei(&self) -> Result<U256> {
        to_wei(self.amount, self.token.decimals())
    }
}

/// An amount requested by the user, with the "all" flag set when the user
/// asked to move their entire balance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTokenAmount {
    /// The token.
    pub token: Token,
    /// Amount in human units.
    pub amount: Decimal,
    /// Whether the user requested their whole balance.
    #[serde(default)]
    pub max: bool,
}

impl InputTokenAmount {
    /// Creates an exact-amount input.
    #[must_use]
    pub fn new(token: Token, amount: Decimal) -> Self {
        Self { token, amount, max: false }
    }

    /// Creates an input for the user's whole balance of `token`.
    #[must_use]
    pub fn max(token: Token, amount: Decimal) -> Self {
        Self { token, amount, max: true }
    }

    /// The amount in base units of the token.
    ///
    /// # Errors
    ///
    /// See [`to_wei`].
    pub fn to_wei(&self) -> Result<U256> {
        to_wei(self.amount, self.token.decimals())
    }
}

impl From<InputTokenAmount> for TokenAmount {
    fn from(input: InputTokenAmount) -> Self {
        Self { token: input.token, amount: input.amount }
    }
}

/// A spending approval that must be in place before a transaction runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Token to approve.
    pub token: Token,
    /// Amount to approve, in human units.
    pub amount: Decimal,
    /// Contract allowed to spend the tokens.
    pub spender_address: Address,
}
