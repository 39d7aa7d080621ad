/*!
# Vault Transact

Quoting and call building for "standard" auto-compounding vaults.

A standard vault accepts a single deposit token and mints a share token whose
value grows as the strategy compounds. This crate computes what a user gets
before they sign anything (quotes), and builds the exact contract call that
performs the deposit or withdrawal (zap steps) for a downstream batch-call
composer.

## Usage

```ignore
use std::sync::Arc;

use vault_transact::{
    oracle::ProviderOracle, withdraw::StandardWithdrawalCalculator,
    StandardVaultType,
};

let provider = alloy::providers::ProviderBuilder::new()
    .connect_http(rpc_url);
let engine = StandardVaultType::new(
    vault,
    Arc::new(snapshot),
    ProviderOracle::new(provider.clone()),
    StandardWithdrawalCalculator::new(provider),
)?;

let option = engine.fetch_deposit_option();
let quote = engine.fetch_deposit_quote(&inputs, &option)?;
let response = engine.fetch_zap_deposit(&inputs).await?;
```
*/

#![allow(clippy::module_name_repetitions, async_fn_in_trait)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod abi;
pub mod entities;
mod error;
pub mod fee;
pub mod options;
pub mod oracle;
pub mod quote;
pub mod state;
pub mod step;
pub mod utils;
mod vault_type;
pub mod withdraw;
pub mod zap;

pub use error::{Error, Result};
pub use vault_type::{
    StandardVaultType, VaultDepositResponse, VaultWithdrawResponse,
    ZapResponse,
};
