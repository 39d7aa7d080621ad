//! Command-line front end of the standard vault engine.
//!
//! Reads a vault description from a TOML file, talks to the chain over HTTP
//! and prints quotes, steps and encoded calls as JSON.

use std::{path::PathBuf, sync::Arc};

use alloy::providers::{Provider, ProviderBuilder};
use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};
use eyre::Context;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vault_transact::{
    abi::IStandardVault,
    entities::{InputTokenAmount, VaultStandard},
    oracle::{ProviderOracle, SharePriceOracle},
    quote::Quote,
    state::StateSnapshot,
    step::{MessageKeys, Step},
    withdraw::StandardWithdrawalCalculator,
    StandardVaultType,
};

use crate::config::Config;

mod config;

#[derive(Parser)]
#[command(name = "vault-quote", version, about, long_about = None)]
struct Cli {
    /// Vault configuration file.
    #[arg(short, long, env = "VAULT_CONFIG", default_value = "vault.toml")]
    config: PathBuf,

    /// RPC endpoint, overrides `chain.rpc_url`.
    #[arg(long, env = "RPC_URL")]
    rpc_url: Option<String>,

    /// Connected wallet, overrides `wallet`.
    #[arg(short, long)]
    wallet: Option<Address>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the deposit and withdraw options of the vault.
    Options,
    /// Quote a deposit.
    DepositQuote(Request),
    /// Quote a withdrawal from the last share price and balance.
    WithdrawQuote(Request),
    /// Build the deposit call.
    ZapDeposit(Request),
    /// Build the withdrawal call. Requires a wallet.
    ZapWithdraw(Request),
}

#[derive(Args)]
struct Request {
    /// Amount of the deposit token, in human units.
    #[arg(short, long)]
    amount: Decimal,

    /// Move the whole balance.
    #[arg(long)]
    max: bool,
}

#[derive(Serialize)]
struct QuoteOutput {
    quote: Quote,
    step: Step,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    let vault = config.vault();
    let provider = ProviderBuilder::new()
        .connect_http(config.rpc_url(cli.rpc_url.as_deref())?);

    let mut snapshot = config.snapshot(cli.wallet);
    if matches!(cli.command, Command::WithdrawQuote(_)) {
        snapshot = refresh(snapshot, &vault, &provider).await?;
    }

    let engine = StandardVaultType::new(
        vault,
        Arc::new(snapshot),
        ProviderOracle::new(&provider),
        StandardWithdrawalCalculator::new(&provider),
    )?;
    let inputs = |request: &Request| {
        vec![InputTokenAmount {
            token: engine.deposit_token().clone(),
            amount: request.amount,
            max: request.max,
        }]
    };

    let output = match &cli.command {
        Command::Options => serde_json::json!({
            "deposit": engine.fetch_deposit_option(),
            "withdraw": engine.fetch_withdraw_option(),
        }),
        Command::DepositQuote(request) => {
            let option = engine.fetch_deposit_option();
            let quote =
                engine.fetch_deposit_quote(&inputs(request), &option)?;
            let step = engine.fetch_deposit_step(&quote, &MessageKeys)?;
            serde_json::to_value(QuoteOutput { quote, step })?
        }
        Command::WithdrawQuote(request) => {
            let option = engine.fetch_withdraw_option();
            let quote =
                engine.fetch_withdraw_quote(&inputs(request), &option)?;
            let step = engine.fetch_withdraw_step(&quote, &MessageKeys)?;
            serde_json::to_value(QuoteOutput { quote, step })?
        }
        Command::ZapDeposit(request) => serde_json::to_value(
            engine.fetch_zap_deposit(&inputs(request)).await?,
        )?,
        Command::ZapWithdraw(request) => serde_json::to_value(
            engine.fetch_zap_withdraw(&inputs(request)).await?,
        )?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Caches the current share price, and the wallet's share balance when a
/// wallet is connected, for quotes computed from state. Both values come
/// from one batched call.
async fn refresh(
    snapshot: StateSnapshot,
    vault: &VaultStandard,
    provider: &impl Provider,
) -> eyre::Result<StateSnapshot> {
    let Some(wallet) = snapshot.wallet_address() else {
        let ppfs =
            ProviderOracle::new(provider).price_per_full_share(vault).await?;
        return Ok(snapshot.with_price_per_full_share(vault.id.clone(), ppfs));
    };

    let contract = IStandardVault::new(vault.contract_address, provider);
    let (ppfs, shares) = provider
        .multicall()
        .add(contract.getPricePerFullShare())
        .add(contract.balanceOf(wallet))
        .aggregate()
        .await
        .wrap_err_with(|| {
            format!("failed to read position of {wallet} in {}", vault.id)
        })?;
    tracing::debug!(
        vault = %vault.id,
        %wallet,
        %ppfs,
        %shares,
        "read share price and balance"
    );

    Ok(snapshot
        .with_price_per_full_share(vault.id.clone(), ppfs)
        .with_share_balance(vault.id.clone(), shares))
}

#[cfg(test)]
mod tests {
    use alloy::{providers::ProviderBuilder, transports::mock::Asserter};
    use alloy_primitives::{address, uint, Bytes, U256};
    use alloy_sol_types::SolValue;
    use vault_transact::state::StateSnapshot;

    use super::refresh;
    use crate::config::Config;

    const CONFIG: &str = r#"
        [chain]
        id = "bsc"
        native_symbol = "BNB"

        [vault]
        id = "bnb-vault"
        contract_address = "0x6BE4741AB0aD233e4315a10bc783a7B923386b71"
        deposit_token = "native"
        share_symbol = "mooBNB"
    "#;

    const PPFS: U256 = uint!(1_250_000_000_000_000_000_U256);
    const SHARES: U256 = uint!(8_000_000_000_000_000_000_U256);

    fn config() -> Config {
        CONFIG.parse().unwrap()
    }

    #[tokio::test]
    async fn refresh_reads_price_and_balance_together() {
        let asserter = Asserter::new();
        let provider =
            ProviderBuilder::new().connect_mocked_client(asserter.clone());
        let return_data = vec![
            Bytes::from(PPFS.abi_encode()),
            Bytes::from(SHARES.abi_encode()),
        ];
        let aggregate: Bytes =
            (U256::from(1), return_data).abi_encode_params().into();
        asserter.push_success(&aggregate);

        let config = config();
        let vault = config.vault();
        let alice = address!("A11CE00000000000000000000000000000000000");
        let snapshot =
            refresh(config.snapshot(Some(alice)), &vault, &provider)
                .await
                .unwrap();

        assert_eq!(snapshot.price_per_full_share("bnb-vault"), Some(PPFS));
        assert_eq!(snapshot.share_balance("bnb-vault"), Some(SHARES));
    }

    #[tokio::test]
    async fn refresh_without_wallet_reads_price_only() {
        let asserter = Asserter::new();
        let provider =
            ProviderBuilder::new().connect_mocked_client(asserter.clone());
        asserter.push_success(&Bytes::from(PPFS.abi_encode()));

        let config = config();
        let snapshot: StateSnapshot =
            refresh(config.snapshot(None), &config.vault(), &provider)
                .await
                .unwrap();

        assert_eq!(snapshot.price_per_full_share("bnb-vault"), Some(PPFS));
        assert_eq!(snapshot.share_balance("bnb-vault"), None);
    }

    #[tokio::test]
    async fn refresh_reports_failed_reads() {
        let asserter = Asserter::new();
        let provider =
            ProviderBuilder::new().connect_mocked_client(asserter.clone());
        asserter.push_failure_msg("boom");

        let config = config();
        let alice = address!("A11CE00000000000000000000000000000000000");
        let vault = config.vault();
        let err = refresh(config.snapshot(Some(alice)), &vault, &provider)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed to read position"));
    }
}
