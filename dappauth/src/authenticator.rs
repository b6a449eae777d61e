//! Authorization decision procedures.
//!
//! [`Authenticator`] ties recovery and the capability probes together:
//!
//! - [`Authenticator::verify_signer`]: is the signer authorized for this exact
//!   account? EOA match first, then ERC-1271 `isValidSignature`.
//! - [`Authenticator::verify_action_authority`]: may the signer act for this
//!   identity? EOA match first, then ERC-165 detection and an ERC-725 `ACTION` key
//!   lookup.
//!
//! A failed local recovery is never fatal on its own; it is carried along and
//! reported only if the contract path cannot be evaluated either.

use alloy_primitives::Address;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::caller::{CallContext, ContractCaller};
use crate::capability::CapabilityClient;
use crate::challenge::decode_strict_hex;
use crate::config::AuthenticatorConfig;
use crate::contract::ACTION_PURPOSE;
use crate::error::{AuthError, InputError};
use crate::hash::ChallengeHashes;
use crate::recovery::recover_signer;
use crate::signature::RawSignature;

/// Checks signatures against EOAs and smart-contract accounts.
///
/// Holds no mutable state: one instance can serve concurrent verifications as long
/// as its [`ContractCaller`] can.
#[derive(Debug, Clone)]
pub struct Authenticator<C> {
    caller: C,
    config: AuthenticatorConfig,
    context: CallContext,
}

impl<C: ContractCaller> Authenticator<C> {
    /// Creates an authenticator with the default configuration and a context that
    /// reads at the latest block and is never cancelled.
    pub fn new(caller: C) -> Self {
        Self {
            caller,
            config: AuthenticatorConfig::default(),
            context: CallContext::new(),
        }
    }

    /// Applies `config`. Its block and timeout govern every remote read; the
    /// cancellation token of the current context is kept.
    #[must_use]
    pub fn with_config(mut self, config: AuthenticatorConfig) -> Self {
        self.config = config;
        self.sync_context();
        self
    }

    /// Cancels remote reads through `context.cancellation`.
    ///
    /// Only the token is taken from `context`. The block and timeout always come
    /// from the [`AuthenticatorConfig`], so builder order does not matter.
    #[must_use]
    pub fn with_context(mut self, context: CallContext) -> Self {
        self.context = context;
        self.sync_context();
        self
    }

    fn sync_context(&mut self) {
        self.context.block = self.config.block;
        self.context.timeout = self.config.timeout();
    }

    /// The underlying contract caller.
    pub const fn caller(&self) -> &C {
        &self.caller
    }

    /// The active configuration.
    pub const fn config(&self) -> &AuthenticatorConfig {
        &self.config
    }

    /// The context used for remote reads. Its block and timeout mirror
    /// [`config`](Self::config).
    pub const fn context(&self) -> &CallContext {
        &self.context
    }

    /// Checks whether `signature` over `challenge` authorizes the signer for the
    /// account at `address`.
    ///
    /// `signature` and `address` are hex strings, optionally `0x`-prefixed.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MalformedInput`] for bad hex or wrong lengths
    /// - [`AuthError::Contract`] / [`AuthError::BothFlows`] if the contract fallback
    ///   cannot be evaluated
    pub async fn verify_signer(
        &self,
        challenge: &str,
        signature: &str,
        address: &str,
    ) -> Result<bool, AuthError> {
        let signature = RawSignature::from_hex(signature)?;
        let address = parse_address(address)?;
        self.is_authorized_signer(challenge, &signature, address)
            .await
    }

    /// Typed form of [`verify_signer`](Self::verify_signer).
    ///
    /// 1. Recover the signer of the `personal_sign` hash. A match with `address` is
    ///    authorized without any remote call.
    /// 2. Otherwise ask `address` via ERC-1271 whether it accepts the original
    ///    signature over the bare challenge hash.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Contract`] or, if recovery also failed,
    /// [`AuthError::BothFlows`] when the ERC-1271 probe cannot be evaluated.
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
        address = %address,
        signatures = signature.count(),
    )))]
    pub async fn is_authorized_signer(
        &self,
        challenge: &str,
        signature: &RawSignature,
        address: Address,
    ) -> Result<bool, AuthError> {
        let hashes = ChallengeHashes::new(challenge);
        let eoa_failure = match recover_signer(&hashes.personal, signature) {
            Ok(signer) if signer.address == address => return Ok(true),
            Ok(_) => None,
            Err(e) => {
                #[cfg(feature = "telemetry")]
                tracing::debug!(reason = %e, "local recovery failed, trying contract wallet");
                Some(e)
            }
        };

        CapabilityClient::new(&self.caller, &self.context, address)
            .accepts_signature(self.config.signature_standard, hashes.contract, signature)
            .await
            .map_err(|contract| AuthError::merge(eoa_failure, contract))
    }

    /// Checks whether the signer of `signature` over `challenge` holds action
    /// authority over the identity at `address`.
    ///
    /// `signature` and `address` are hex strings, optionally `0x`-prefixed.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MalformedInput`] for bad hex or wrong lengths
    /// - [`AuthError::Recovery`] if the identity is an ERC-725 contract but no key
    ///   could be recovered to look up. The interface probe succeeded in this
    ///   case, which tells it apart from a local failure on an EOA target: there
    ///   the contract path either answers `false` or fails as
    ///   [`AuthError::BothFlows`]
    /// - [`AuthError::Contract`] / [`AuthError::BothFlows`] if a probe fails
    pub async fn verify_action_authority(
        &self,
        challenge: &str,
        signature: &str,
        address: &str,
    ) -> Result<bool, AuthError> {
        let signature = RawSignature::from_hex(signature)?;
        let address = parse_address(address)?;
        self.has_action_authority(challenge, &signature, address)
            .await
    }

    /// Typed form of [`verify_action_authority`](Self::verify_action_authority).
    ///
    /// 1. Recover the signer. A match with `address` is a direct key match.
    /// 2. Ask `address` via ERC-165 whether it is an ERC-725 identity. If not, the
    ///    answer is a plain `false`.
    /// 3. Look up the recovered key identifier with the `ACTION` purpose.
    ///
    /// # Errors
    ///
    /// See [`verify_action_authority`](Self::verify_action_authority).
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(address = %address)))]
    pub async fn has_action_authority(
        &self,
        challenge: &str,
        signature: &RawSignature,
        address: Address,
    ) -> Result<bool, AuthError> {
        let hashes = ChallengeHashes::new(challenge);
        let recovered = match recover_signer(&hashes.personal, signature) {
            Ok(signer) if signer.address == address => return Ok(true),
            other => other,
        };

        let client = CapabilityClient::new(&self.caller, &self.context, address);
        let identity = match client.identity_interface().await {
            Ok(identity) => identity,
            Err(contract) => return Err(AuthError::merge(recovered.err(), contract)),
        };
        if identity.is_none() {
            #[cfg(feature = "telemetry")]
            tracing::debug!("target declares no ERC-725 interface");
            return Ok(false);
        }

        let signer = recovered.map_err(AuthError::Recovery)?;
        Ok(client.key_has_purpose(signer.key_id, ACTION_PURPOSE).await?)
    }
}

const ADDRESS_LENGTH: usize = 20;

/// Parses a 20-byte hex address, with or without `0x`.
fn parse_address(address: &str) -> Result<Address, InputError> {
    let bytes = decode_strict_hex(address).ok_or(InputError::InvalidHex { field: "address" })?;
    if bytes.len() != ADDRESS_LENGTH {
        return Err(InputError::InvalidLength {
            field: "address",
            expected: "20 bytes",
            actual: bytes.len(),
        });
    }
    Ok(Address::from_slice(&bytes))
}
