//! Error type shared by every operation of the engine.

use crate::entities::Token;

/// Alias for results returned by this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// An error returned by the transact engine.
///
/// Input validation variants ([`Error::InvalidInput`],
/// [`Error::TokenMismatch`], [`Error::WalletNotConnected`]) are always
/// returned before any chain read is attempted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The request carried a zero or negative amount, or the wrong number
    /// of input tokens.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The supplied token is not the token the vault operates on.
    #[error("input token {actual} is not the vault token {expected}")]
    TokenMismatch {
        /// Token the vault expects.
        expected: Token,
        /// Token that was supplied.
        actual: Token,
    },
    /// Executing a withdrawal requires a connected wallet address.
    #[error("wallet is not connected")]
    WalletNotConnected,
    /// A read from the chain failed.
    #[error("chain communication failed: {0}")]
    ChainCommunication(String),
    /// The engine was constructed for a vault or token it cannot handle.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// Cached application state needed by the operation is missing.
    #[error("missing state: {0}")]
    MissingState(String),
    /// The vault reported a share price of zero.
    #[error("vault {0} reported a zero share price")]
    InvalidSharePrice(String),
    /// A value does not fit into its numeric representation.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),
}

impl Error {
    /// Whether the error was caused by the user's input and can be fixed by
    /// changing it.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::WalletNotConnected)
    }

    pub(crate) fn chain<E: core::fmt::Display>(err: E) -> Self {
        Self::ChainCommunication(err.to_string())
    }
}
