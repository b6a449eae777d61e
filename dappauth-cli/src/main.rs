//! `dappauth` command-line verifier.
//!
//! # Usage
//!
//! ```bash
//! # Is the signer authorized for the account?
//! dappauth --rpc-url https://rpc.example signer \
//!     --challenge foo --signature 0x... --address 0x...
//!
//! # Does the signer hold action authority over the ERC-725 identity?
//! DAPPAUTH_RPC_URL=https://rpc.example dappauth action \
//!     --challenge foo --signature 0x... --address 0x...
//! ```
//!
//! Prints `authorized` or `unauthorized`. Exit status is `0` when authorized,
//! `1` when not, and `2` when the check could not be evaluated.
//!
//! `RUST_LOG` sets the log filter (default: `info`). Logs go to stderr.

mod cli;

use std::process::ExitCode;

use alloy_provider::ProviderBuilder;
use clap::Parser;
use dappauth::{Authenticator, CallContext, ProviderCaller};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

const EXIT_UNAUTHORIZED: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => report("authorized", ExitCode::SUCCESS),
        Ok(false) => report("unauthorized", ExitCode::from(EXIT_UNAUTHORIZED)),
        Err(e) => {
            tracing::error!("Authorization check failed: {e}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[allow(clippy::print_stdout)]
fn report(verdict: &str, code: ExitCode) -> ExitCode {
    println!("{verdict}");
    code
}

async fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli.authenticator_config();
    tracing::debug!(
        rpc_url = %cli.rpc_url,
        block = %config.block,
        standard = ?config.signature_standard,
        "Loaded configuration"
    );

    let cancellation = CancellationToken::new();
    tokio::spawn(cancel_on_ctrl_c(cancellation.clone()));

    let provider = ProviderBuilder::new().connect_http(cli.rpc_url);
    let authenticator = Authenticator::new(ProviderCaller::new(provider))
        .with_context(CallContext::new().with_cancellation(cancellation))
        .with_config(config);

    let authorized = match &cli.command {
        Command::Signer(check) => {
            authenticator
                .verify_signer(&check.challenge, &check.signature, &check.address)
                .await?
        }
        Command::Action(check) => {
            authenticator
                .verify_action_authority(&check.challenge, &check.signature, &check.address)
                .await?
        }
    };
    Ok(authorized)
}

/// Cancels in-flight contract reads on Ctrl-C.
async fn cancel_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl-C, cancelling...");
            token.cancel();
        }
        Err(e) => tracing::warn!("Failed to listen for Ctrl-C: {e}"),
    }
}
