//! Tokens the engine moves around: the chain's native currency and ERC-20
//! contracts.

use core::{fmt, str::FromStr};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Identifier of a chain, e.g. `bsc` or `arbitrum`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Creates a new chain identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The native currency of a chain (ETH, BNB, ...).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NativeToken {
    /// Chain the currency belongs to.
    pub chain_id: ChainId,
    /// Display symbol.
    pub symbol: String,
    /// Decimal precision of one unit.
    pub decimals: u8,
}

impl PartialEq for NativeToken {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id
    }
}

impl Eq for NativeToken {}

/// An ERC-20 token contract.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Erc20Token {
    /// Chain the contract is deployed on.
    pub chain_id: ChainId,
    /// Contract address.
    pub address: Address,
    /// Display symbol.
    pub symbol: String,
    /// Decimal precision of one unit.
    pub decimals: u8,
}

impl PartialEq for Erc20Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Erc20Token {}

/// A token, either the native currency or an ERC-20 contract.
///
/// Equality only looks at the kind, the chain and the address. Symbols are
/// display data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    /// Native currency of the chain.
    Native(NativeToken),
    /// ERC-20 token.
    Erc20(Erc20Token),
}

impl Token {
    /// Chain the token lives on.
    #[must_use]
    pub fn chain_id(&self) -> &ChainId {
        match self {
            Self::Native(token) => &token.chain_id,
            Self::Erc20(token) => &token.chain_id,
        }
    }

    /// Decimal precision of the token.
    #[must_use]
    pub fn decimals(&self) -> u8 {
        match self {
            Self::Native(token) => token.decimals,
            Self::Erc20(token) => token.decimals,
        }
    }

    /// Display symbol of the token.
    #[must_use]
    pub fn symbol(&self) -> &str {
        match self {
            Self::Native(token) => &token.symbol,
            Self::Erc20(token) => &token.symbol,
        }
    }

    /// Contract address, [`None`] for the native currency.
    #[must_use]
    pub fn address(&self) -> Option<Address> {
        match self {
            Self::Native(_) => None,
            Self::Erc20(token) => Some(token.address),
        }
    }

    /// The address form used to look the token up.
    #[must_use]
    pub fn token_address(&self) -> TokenAddress {
        match self {
            Self::Native(_) => TokenAddress::Native,
            Self::Erc20(token) => TokenAddress::Contract(token.address),
        }
    }

    /// Whether this is the chain's native currency.
    #[must_use]
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Returns the ERC-20 token, if this is one.
    #[must_use]
    pub fn as_erc20(&self) -> Option<&Erc20Token> {
        match self {
            Self::Native(_) => None,
            Self::Erc20(token) => Some(token),
        }
    }
}

impl From<Erc20Token> for Token {
    fn from(token: Erc20Token) -> Self {
        Self::Erc20(token)
    }
}

impl From<NativeToken> for Token {
    fn from(token: NativeToken) -> Self {
        Self::Native(token)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}:{})",
            self.symbol(),
            self.chain_id(),
            self.token_address()
        )
    }
}

/// How a vault refers to its deposit token: the native currency or a
/// contract address.
///
/// Parses from and renders to either `native` or a hex address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenAddress {
    /// The chain's native currency.
    Native,
    /// An ERC-20 contract.
    Contract(Address),
}

const NATIVE: &str = "native";

impl FromStr for TokenAddress {
    type Err = alloy_primitives::hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(NATIVE) {
            return Ok(Self::Native);
        }
        s.parse::<Address>().map(Self::Contract)
    }
}

impl TryFrom<String> for TokenAddress {
    type Error = alloy_primitives::hex::FromHexError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TokenAddress> for String {
    fn from(value: TokenAddress) -> Self {
        value.to_string()
    }
}

impl fmt::Display for TokenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => f.write_str(NATIVE),
            Self::Contract(address) => write!(f, "{address}"),
        }
    }
}
