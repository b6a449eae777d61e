#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Signature authorization for Ethereum accounts.
//!
//! This crate answers one question: does a signature over an application-chosen
//! challenge prove that the signer may act for a given address? The address may be
//! an externally-owned account (EOA) or a smart-contract wallet whose notion of a
//! valid signature lives on-chain.
//!
//! # Features
//!
//! - **EOA fast path**: local `personal_sign` recovery, no network round-trip
//! - **ERC-1271 wallets**: `isValidSignature` in both the `bytes32` and the legacy
//!   `bytes` flavours
//! - **ERC-725 identities**: ERC-165 capability probe followed by an
//!   `ACTION`-purpose key lookup
//! - **Diagnosable failures**: a failed local recovery is remembered and merged with
//!   any contract-side failure
//!
//! # Architecture
//!
//! - [`challenge`] - Challenge canonicalization (hex vs. UTF-8)
//! - [`hash`] - `personal_sign`, contract and ERC-191 digests
//! - [`signature`] - Raw signature parsing and `v` normalization
//! - [`recovery`] - Local public-key recovery
//! - [`contract`] - Solidity bindings and magic constants
//! - [`caller`] - The [`ContractCaller`] transport seam and [`CallContext`]
//! - [`capability`] - Remote ERC-165 / ERC-1271 / ERC-725 probes
//! - [`authenticator`] - The [`Authenticator`] decision procedures
//!
//! # Feature Flags
//!
//! - `provider` - [`ContractCaller`] adapter for any `alloy` provider
//! - `telemetry` - `tracing` spans around verification and remote reads
//!
//! # Example
//!
//! ```no_run
//! # async fn example<C: dappauth::ContractCaller>(caller: C) -> Result<(), dappauth::AuthError> {
//! use dappauth::Authenticator;
//!
//! let authenticator = Authenticator::new(caller);
//! let authorized = authenticator
//!     .verify_signer(
//!         "login nonce 42",
//!         "0x5f0a...1b",
//!         "0x6b5C4d1bA1c5C5e1c3c0a6d2f1b0e9a8d7c6b5a4",
//!     )
//!     .await?;
//! # let _ = authorized;
//! # Ok(())
//! # }
//! ```

pub mod authenticator;
pub mod caller;
pub mod capability;
pub mod challenge;
pub mod config;
pub mod contract;
pub mod error;
pub mod hash;
pub mod recovery;
pub mod signature;

pub use authenticator::Authenticator;
pub use caller::{BlockContext, CallContext, ContractCaller};
#[cfg(feature = "provider")]
pub use caller::ProviderCaller;
pub use config::{AuthenticatorConfig, SignatureStandard};
pub use error::{AuthError, CapabilityError, ErrorKind, InputError, RecoveryError};
pub use signature::RawSignature;
