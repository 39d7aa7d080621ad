//! TOML description of a vault and the chain it lives on.

use std::path::Path;

use alloy::transports::http::reqwest::Url;
use alloy_primitives::Address;
use eyre::{Context, OptionExt};
use serde::Deserialize;
use vault_transact::{
    entities::{
        ChainId, Erc20Token, NativeToken, TokenAddress, VaultKind,
        VaultStandard,
    },
    state::{Fees, StateSnapshot},
};

/// Default number of decimals of native currencies and share tokens.
const DEFAULT_DECIMALS: u8 = 18;

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

fn default_kind() -> VaultKind {
    VaultKind::Standard
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Config {
    /// Connected wallet.
    #[serde(default)]
    pub(crate) wallet: Option<Address>,
    pub(crate) chain: ChainConfig,
    pub(crate) vault: VaultConfig,
    #[serde(default)]
    pub(crate) tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub(crate) fees: Fees,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ChainConfig {
    pub(crate) id: ChainId,
    pub(crate) native_symbol: String,
    #[serde(default = "default_decimals")]
    pub(crate) native_decimals: u8,
    #[serde(default)]
    pub(crate) rpc_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct VaultConfig {
    pub(crate) id: String,
    pub(crate) contract_address: Address,
    /// Either `native` or the address of an ERC-20 token listed in
    /// `tokens`.
    pub(crate) deposit_token: TokenAddress,
    pub(crate) share_symbol: String,
    #[serde(default = "default_decimals")]
    pub(crate) share_decimals: u8,
    #[serde(default = "default_kind")]
    pub(crate) kind: VaultKind,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TokenConfig {
    pub(crate) address: Address,
    pub(crate) symbol: String,
    pub(crate) decimals: u8,
}

impl Config {
    /// Reads and parses the configuration at `path`.
    pub(crate) fn load(path: &Path) -> eyre::Result<Self> {
        let raw = std::fs::read_to_string(path).wrap_err_with(|| {
            format!("failed to read config file {}", path.display())
        })?;
        raw.parse()
    }

    pub(crate) fn vault(&self) -> VaultStandard {
        VaultStandard {
            id: self.vault.id.clone(),
            chain_id: self.chain.id.clone(),
            contract_address: self.vault.contract_address,
            deposit_token_address: self.vault.deposit_token,
            kind: self.vault.kind,
        }
    }

    /// Builds the state the engine starts from. `wallet` takes precedence
    /// over the configured wallet.
    pub(crate) fn snapshot(&self, wallet: Option<Address>) -> StateSnapshot {
        let chain_id = &self.chain.id;
        let mut snapshot = StateSnapshot::new()
            .with_chain(NativeToken {
                chain_id: chain_id.clone(),
                symbol: self.chain.native_symbol.clone(),
                decimals: self.chain.native_decimals,
            })
            .with_token(Erc20Token {
                chain_id: chain_id.clone(),
                address: self.vault.contract_address,
                symbol: self.vault.share_symbol.clone(),
                decimals: self.vault.share_decimals,
            })
            .with_fees(self.vault.id.clone(), self.fees);

        for token in &self.tokens {
            snapshot = snapshot.with_token(Erc20Token {
                chain_id: chain_id.clone(),
                address: token.address,
                symbol: token.symbol.clone(),
                decimals: token.decimals,
            });
        }

        match wallet.or(self.wallet) {
            Some(address) => snapshot.with_wallet(address),
            None => snapshot,
        }
    }

    /// RPC endpoint to read from. `rpc_url` takes precedence over the
    /// configured endpoint.
    pub(crate) fn rpc_url(&self, rpc_url: Option<&str>) -> eyre::Result<Url> {
        let raw = rpc_url
            .or(self.chain.rpc_url.as_deref())
            .ok_or_eyre(
                "no RPC URL configured, set RPC_URL or chain.rpc_url",
            )?;
        raw.parse().wrap_err_with(|| format!("invalid RPC URL {raw}"))
    }
}

impl std::str::FromStr for Config {
    type Err = eyre::Report;

    fn from_str(raw: &str) -> eyre::Result<Self> {
        toml::from_str(raw).wrap_err("failed to parse config")
    }
}
