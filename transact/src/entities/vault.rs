//! Vault descriptors.

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

use super::{ChainId, TokenAddress};

/// Kind of vault contract. Each kind has its own transact implementation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VaultKind {
    /// Single-token auto-compounding vault issuing a share token.
    Standard,
    /// Reward pool that does not issue a share token.
    Gov,
    /// Concentrated liquidity manager vault.
    Cowcentrated,
}

/// A vault strategy contract as loaded from configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultStandard {
    /// Unique vault identifier.
    pub id: String,
    /// Chain the vault is deployed on.
    pub chain_id: ChainId,
    /// Address of the vault contract, which is also the share token.
    pub contract_address: Address,
    /// Token accepted on deposit.
    pub deposit_token_address: TokenAddress,
    /// Kind of the vault contract.
    #[serde(default = "standard")]
    pub kind: VaultKind,
}

fn standard() -> VaultKind {
    VaultKind::Standard
}

impl VaultStandard {
    /// Whether the vault is a standard vault.
    #[must_use]
    pub fn is_standard(&self) -> bool {
        self.kind == VaultKind::Standard
    }
}
