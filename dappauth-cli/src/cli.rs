//! Command-line arguments.
//!
//! Every global option can also come from the environment (or a `.env` file):
//!
//! - `DAPPAUTH_RPC_URL`: JSON-RPC endpoint used for contract reads
//! - `DAPPAUTH_BLOCK`: `latest` (default), `pending` or a block number
//! - `DAPPAUTH_TIMEOUT_SECS`: per-call timeout for contract reads
//! - `DAPPAUTH_LEGACY_ERC1271`: call `isValidSignature(bytes,bytes)` instead of
//!   `isValidSignature(bytes32,bytes)`

use clap::{Args, Parser, Subcommand};
use dappauth::{AuthenticatorConfig, BlockContext, SignatureStandard};
use url::Url;

/// Check whether a signature authorizes an address, for EOAs and contract wallets.
#[derive(Debug, Parser)]
#[command(name = "dappauth", version, about)]
pub struct Cli {
    /// HTTP JSON-RPC endpoint.
    #[arg(long, env = "DAPPAUTH_RPC_URL")]
    pub rpc_url: Url,

    /// Block to read contract state at.
    #[arg(long, env = "DAPPAUTH_BLOCK", default_value_t = BlockContext::Latest)]
    pub block: BlockContext,

    /// Timeout for each contract read, in seconds.
    #[arg(long, env = "DAPPAUTH_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Use the draft ERC-1271 `isValidSignature(bytes,bytes)` method.
    #[arg(long, env = "DAPPAUTH_LEGACY_ERC1271")]
    pub legacy_erc1271: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Which authorization question to ask.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Is the signer authorized for the account (EOA or ERC-1271 wallet)?
    Signer(Check),
    /// Does the signer hold action authority over the ERC-725 identity?
    Action(Check),
}

/// Inputs shared by both checks.
#[derive(Debug, Args)]
pub struct Check {
    /// The challenge that was signed. Hex challenges are signed as bytes.
    #[arg(long)]
    pub challenge: String,

    /// Hex-encoded signature, optionally several concatenated.
    #[arg(long)]
    pub signature: String,

    /// Hex-encoded address of the account.
    #[arg(long)]
    pub address: String,
}

impl Cli {
    /// Library configuration derived from the global options.
    pub fn authenticator_config(&self) -> AuthenticatorConfig {
        AuthenticatorConfig {
            signature_standard: if self.legacy_erc1271 {
                SignatureStandard::Erc1271Legacy
            } else {
                SignatureStandard::Erc1271
            },
            block: self.block,
            timeout_ms: self.timeout_secs.map(|secs| secs.saturating_mul(1000)),
        }
    }
}
