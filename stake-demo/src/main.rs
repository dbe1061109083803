//! Stake Wallet demo
//!
//! Checks that the execution API key, staking API key and private key in
//! the environment work together: balance, optional test transfer, stake
//! intent creation and deposit broadcast, each gated by a prompt.

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stake_wallet::config::Network;
use stake_wallet::flow::{ConsolePrompt, FlowOutcome, StakeFlow};
use stake_wallet::staking::StakingClient;
use stake_wallet::transaction::EthereumChainClient;
use stake_wallet::{Config, Error};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    // Logs go to stderr, progress lines to stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::error!("Failed to load .env: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match run(|key| std::env::var(key).ok(), &mut io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Resolve the configuration and walk the flow, writing progress to `out`
async fn run<F, W>(lookup: F, out: &mut W) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    let Some(config) = resolve_config(lookup, out)? else {
        return Ok(());
    };

    tracing::info!(network = %config.network, "Starting credential validation");

    let chain = EthereumChainClient::from_config(&config)?;
    let mut staking = StakingClient::from_config(&config);
    let mut prompt = ConsolePrompt::stdio();

    let report = StakeFlow::new(&config, &chain, &mut staking, &mut prompt, out)
        .run()
        .await
        .context("Credential validation failed")?;

    match report.outcome {
        FlowOutcome::Completed => tracing::info!("Deposit broadcast, credentials verified"),
        FlowOutcome::DeclinedIntent => tracing::info!("Stopped before stake intent creation"),
        FlowOutcome::DeclinedBroadcast => tracing::info!("Stopped before deposit broadcast"),
    }

    Ok(())
}

/// Resolve the configuration, or `None` when the network is not supported.
///
/// An unsupported network is a clean no-op: one diagnostic line and a
/// success exit status, before any network call is made.
fn resolve_config<F, W>(lookup: F, out: &mut W) -> anyhow::Result<Option<Config>>
where
    F: Fn(&str) -> Option<String>,
    W: Write,
{
    match Config::from_lookup(lookup) {
        Ok(config) => Ok(Some(config)),
        Err(Error::UnsupportedNetwork(network)) => {
            writeln!(out, "{}", unsupported_network_message(&network))?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn unsupported_network_message(network: &str) -> String {
    let supported: Vec<&str> = Network::ALL.iter().map(|n| n.as_str()).collect();
    format!(
        "Network {:?} is not supported (expected one of: {})",
        network,
        supported.join(", ")
    )
}
