//! Transact options: which tokens a vault lets the user deposit or withdraw,
//! and the identifiers quotes are keyed by.

use serde::{Deserialize, Serialize};

use crate::entities::{ChainId, Token};

/// Direction of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactMode {
    /// Deposit into the vault.
    Deposit,
    /// Withdraw from the vault.
    Withdraw,
}

/// Strategy identifier of direct vault deposits and withdrawals.
pub const VAULT_STRATEGY_ID: &str = "vault";
/// Vault type identifier of standard vaults.
pub const STANDARD_VAULT_TYPE: &str = "standard";
/// Source identifier of options produced by standard vaults.
pub const STANDARD_OPTION_SOURCE: &str = "vault-standard";

/// A way to transact with a vault, offered to the user before quoting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardVaultOption {
    /// Unique option identifier.
    pub id: String,
    /// Vault the option belongs to.
    pub vault_id: String,
    /// Chain of the vault.
    pub chain_id: ChainId,
    /// Identifier of the token selection.
    pub selection_id: String,
    /// Sort order among options with the same selection.
    pub selection_order: u32,
    /// Tokens the user supplies.
    pub inputs: Vec<Token>,
    /// Tokens the user wants to end up with.
    pub wanted_outputs: Vec<Token>,
    /// Strategy identifier, see [`VAULT_STRATEGY_ID`].
    pub strategy_id: String,
    /// Vault type identifier, see [`STANDARD_VAULT_TYPE`].
    pub vault_type: String,
    /// Direction of the transaction.
    pub mode: TransactMode,
}

impl StandardVaultOption {
    /// Builds the option of `vault_id` for `mode` with `tokens` as both the
    /// inputs and the wanted outputs.
    #[must_use]
    pub fn new(
        vault_id: &str,
        chain_id: &ChainId,
        tokens: Vec<Token>,
        mode: TransactMode,
    ) -> Self {
        let selection_id = create_selection_id(chain_id, &tokens);
        Self {
            id: create_option_id(
                STANDARD_OPTION_SOURCE,
                vault_id,
                &selection_id,
            ),
            vault_id: vault_id.to_string(),
            chain_id: chain_id.clone(),
            selection_id,
            selection_order: 1,
            inputs: tokens.clone(),
            wanted_outputs: tokens,
            strategy_id: VAULT_STRATEGY_ID.to_string(),
            vault_type: STANDARD_VAULT_TYPE.to_string(),
            mode,
        }
    }
}

/// Identifies a set of tokens on a chain, independent of their order.
#[must_use]
pub fn create_selection_id(chain_id: &ChainId, tokens: &[Token]) -> String {
    let mut addresses: Vec<String> = tokens
        .iter()
        .map(|token| token.token_address().to_string().to_lowercase())
        .collect();
    addresses.sort();
    format!("{chain_id}:{}", addresses.join("-"))
}

/// Identifies an option produced by `source` for a vault and selection.
#[must_use]
pub fn create_option_id(
    source: &str,
    vault_id: &str,
    selection_id: &str,
) -> String {
    format!("{source}-{vault_id}-{selection_id}")
}

/// Identifies a quote. The same option and request always give the same
/// identifier.
#[must_use]
pub fn create_quote_id(option_id: &str, request: &str) -> String {
    format!("{option_id}-{request}")
}
