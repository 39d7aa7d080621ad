//! Share price of a vault, read from the chain.

use alloy::providers::Provider;
use alloy_primitives::U256;

use crate::{abi::IStandardVault, entities::VaultStandard, Error, Result};

/// Source of a vault's current share price.
///
/// The price is the number of deposit-token base units one whole share is
/// worth, scaled by `10^share_decimals`. It is used as an exact integer.
pub trait SharePriceOracle {
    /// Reads the current price per full share of `vault`.
    ///
    /// Implementations perform exactly one read and do not cache.
    ///
    /// # Errors
    ///
    /// If the read fails, then the error [`Error::ChainCommunication`] is
    /// returned. It is not retried.
    async fn price_per_full_share(
        &self,
        vault: &VaultStandard,
    ) -> Result<U256>;
}

/// [`SharePriceOracle`] calling `getPricePerFullShare()` through an `alloy`
/// provider.
#[derive(Clone, Debug)]
pub struct ProviderOracle<P> {
    provider: P,
}

impl<P: Provider> ProviderOracle<P> {
    /// Creates an oracle reading through `provider`.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: Provider> SharePriceOracle for ProviderOracle<P> {
    async fn price_per_full_share(
        &self,
        vault: &VaultStandard,
    ) -> Result<U256> {
        let contract =
            IStandardVault::new(vault.contract_address, &self.provider);
        let ppfs = contract
            .getPricePerFullShare()
            .call()
            .await
            .map_err(Error::chain)?;

        tracing::debug!(vault = %vault.id, %ppfs, "read price per full share");
        Ok(ppfs)
    }
}
