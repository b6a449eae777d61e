//! Authenticator configuration.
//!
//! # Example
//!
//! ```
//! use dappauth::{AuthenticatorConfig, BlockContext, SignatureStandard};
//!
//! let config: AuthenticatorConfig = serde_json::from_str(
//!     r#"{ "signature_standard": "erc1271_legacy", "block": "pending", "timeout_ms": 5000 }"#,
//! )
//! .unwrap();
//! assert_eq!(config.signature_standard, SignatureStandard::Erc1271Legacy);
//! assert_eq!(config.block, BlockContext::Pending);
//! ```

use std::time::Duration;

use alloy_primitives::FixedBytes;
use serde::{Deserialize, Serialize};

use crate::caller::BlockContext;
use crate::contract::{ERC1271_LEGACY_MAGIC_VALUE, ERC1271_MAGIC_VALUE};

/// Which historical `isValidSignature` ABI to call on contract wallets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureStandard {
    /// Final ERC-1271: `isValidSignature(bytes32,bytes)`.
    #[default]
    Erc1271,
    /// Draft ERC-1271: `isValidSignature(bytes,bytes)`.
    Erc1271Legacy,
}

impl SignatureStandard {
    /// The value a wallet returns to accept a signature under this standard.
    #[must_use]
    pub const fn magic_value(self) -> FixedBytes<4> {
        match self {
            Self::Erc1271 => ERC1271_MAGIC_VALUE,
            Self::Erc1271Legacy => ERC1271_LEGACY_MAGIC_VALUE,
        }
    }
}

/// Tunables for an [`Authenticator`](crate::Authenticator).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatorConfig {
    /// ERC-1271 flavour used for the contract-wallet fallback.
    #[serde(default)]
    pub signature_standard: SignatureStandard,
    /// Block at which contract state is read.
    #[serde(default)]
    pub block: BlockContext,
    /// Per-call timeout for remote reads, in milliseconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl AuthenticatorConfig {
    /// Per-call timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
