//! Read-only view of the application state the engine depends on.
//!
//! The engine never keeps state between calls. Every operation pulls a fresh
//! [`StateSnapshot`] through a [`StateAccessor`] once and works on that
//! immutable snapshot, so overlapping requests never observe each other.

use std::{collections::HashMap, sync::Arc};

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::entities::{ChainId, Erc20Token, NativeToken, Token, TokenAddress};

/// Fee schedule of a vault, as fractions of the moved amount (`0.001` is
/// 0.1%).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fees {
    /// Fee charged on deposit.
    #[serde(default)]
    pub deposit: Option<Decimal>,
    /// Fee charged on withdrawal.
    #[serde(default)]
    pub withdraw: Option<Decimal>,
}

/// The connected wallet and the balances cached for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletState {
    /// Address of the connected wallet.
    pub address: Address,
    share_balances: HashMap<String, U256>,
}

/// An immutable snapshot of everything the engine reads from the
/// application.
#[derive(Clone, Debug, Default)]
pub struct StateSnapshot {
    chains: HashMap<ChainId, NativeToken>,
    tokens: HashMap<(ChainId, Address), Erc20Token>,
    fees: HashMap<String, Fees>,
    price_per_full_share: HashMap<String, U256>,
    wallet: Option<WalletState>,
}

impl StateSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a chain by its native currency.
    #[must_use]
    pub fn with_chain(mut self, native: NativeToken) -> Self {
        self.chains.insert(native.chain_id.clone(), native);
        self
    }

    /// Registers an ERC-20 token.
    #[must_use]
    pub fn with_token(mut self, token: Erc20Token) -> Self {
        self.tokens.insert((token.chain_id.clone(), token.address), token);
        self
    }

    /// Sets the fee schedule of a vault.
    #[must_use]
    pub fn with_fees(
        mut self,
        vault_id: impl Into<String>,
        fees: Fees,
    ) -> Self {
        self.fees.insert(vault_id.into(), fees);
        self
    }

    /// Caches the last known share price of a vault.
    #[must_use]
    pub fn with_price_per_full_share(
        mut self,
        vault_id: impl Into<String>,
        ppfs: U256,
    ) -> Self {
        self.price_per_full_share.insert(vault_id.into(), ppfs);
        self
    }

    /// Connects a wallet.
    #[must_use]
    pub fn with_wallet(mut self, address: Address) -> Self {
        self.wallet =
            Some(WalletState { address, share_balances: HashMap::new() });
        self
    }

    /// Caches the connected wallet's share balance in a vault, in base
    /// units. Ignored when no wallet is connected.
    #[must_use]
    pub fn with_share_balance(
        mut self,
        vault_id: impl Into<String>,
        shares: U256,
    ) -> Self {
        if let Some(wallet) = self.wallet.as_mut() {
            wallet.share_balances.insert(vault_id.into(), shares);
        }
        self
    }

    /// Native currency of `chain_id`.
    #[must_use]
    pub fn native_token(&self, chain_id: &ChainId) -> Option<&NativeToken> {
        self.chains.get(chain_id)
    }

    /// Resolves a token by its address on `chain_id`.
    #[must_use]
    pub fn token_by_address(
        &self,
        chain_id: &ChainId,
        address: TokenAddress,
    ) -> Option<Token> {
        match address {
            TokenAddress::Native => {
                self.native_token(chain_id).cloned().map(Token::Native)
            }
            TokenAddress::Contract(address) => self
                .tokens
                .get(&(chain_id.clone(), address))
                .cloned()
                .map(Token::Erc20),
        }
    }

    /// Fee schedule of `vault_id`.
    #[must_use]
    pub fn fees(&self, vault_id: &str) -> Option<&Fees> {
        self.fees.get(vault_id)
    }

    /// Last known share price of `vault_id`.
    #[must_use]
    pub fn price_per_full_share(&self, vault_id: &str) -> Option<U256> {
        self.price_per_full_share.get(vault_id).copied()
    }

    /// Address of the connected wallet.
    #[must_use]
    pub fn wallet_address(&self) -> Option<Address> {
        self.wallet.as_ref().map(|wallet| wallet.address)
    }

    /// Cached share balance of the connected wallet in `vault_id`.
    #[must_use]
    pub fn share_balance(&self, vault_id: &str) -> Option<U256> {
        self.wallet
            .as_ref()
            .and_then(|wallet| wallet.share_balances.get(vault_id))
            .copied()
    }
}

/// Pull-based access to the latest [`StateSnapshot`].
pub trait StateAccessor {
    /// Returns the current snapshot.
    fn snapshot(&self) -> Arc<StateSnapshot>;
}

impl StateAccessor for Arc<StateSnapshot> {
    fn snapshot(&self) -> Arc<StateSnapshot> {
        Arc::clone(self)
    }
}

/// Follows the snapshots an application publishes through a
/// [`watch::Sender`].
impl StateAccessor for watch::Receiver<Arc<StateSnapshot>> {
    fn snapshot(&self) -> Arc<StateSnapshot> {
        Arc::clone(&self.borrow())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy_primitives::{address, uint};
    use rust_decimal_macros::dec;
    use tokio::sync::watch;

    use super::{Fees, StateAccessor, StateSnapshot};
    use crate::entities::{
        ChainId, Erc20Token, NativeToken, Token, TokenAddress,
    };

    fn bsc() -> ChainId {
        ChainId::from("bsc")
    }

    fn snapshot() -> StateSnapshot {
        StateSnapshot::new()
            .with_chain(NativeToken {
                chain_id: bsc(),
                symbol: "BNB".to_string(),
                decimals: 18,
            })
            .with_token(Erc20Token {
                chain_id: bsc(),
                address: address!("0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82"),
                symbol: "CAKE".to_string(),
                decimals: 18,
            })
    }

    #[test]
    fn resolves_native_and_erc20_tokens() {
        let state = snapshot();

        let native = state.token_by_address(&bsc(), TokenAddress::Native);
        assert!(matches!(native, Some(Token::Native(_))));

        let cake = state.token_by_address(
            &bsc(),
            TokenAddress::Contract(address!(
                "0E09FaBB73Bd3Ade0a17ECC321fD13a19e81cE82"
            )),
        );
        assert_eq!(
            cake.map(|token| token.symbol().to_string()),
            Some("CAKE".to_string())
        );
    }

    #[test]
    fn unknown_chain_resolves_nothing() {
        let state = snapshot();
        let other = ChainId::from("ethereum");
        assert_eq!(state.token_by_address(&other, TokenAddress::Native), None);
    }

    #[test]
    fn share_balance_requires_wallet() {
        let without_wallet =
            snapshot().with_share_balance("cake-vault", uint!(1_U256));
        assert_eq!(without_wallet.share_balance("cake-vault"), None);

        let alice = address!("A11CEacF9aa32246d767FCCD72e02d6bCbcC375d");
        let with_wallet = snapshot()
            .with_wallet(alice)
            .with_share_balance("cake-vault", uint!(1_U256));
        assert_eq!(with_wallet.wallet_address(), Some(alice));
        assert_eq!(
            with_wallet.share_balance("cake-vault"),
            Some(uint!(1_U256))
        );
    }

    #[test]
    fn watch_receiver_follows_latest_snapshot() {
        let (tx, rx) = watch::channel(Arc::new(snapshot()));
        assert_eq!(rx.snapshot().fees("cake-vault"), None);

        let fees = Fees { deposit: Some(dec!(0.001)), withdraw: None };
        tx.send(Arc::new(snapshot().with_fees("cake-vault", fees)))
            .expect("receiver should be alive");
        assert_eq!(rx.snapshot().fees("cake-vault"), Some(&fees));
    }
}
