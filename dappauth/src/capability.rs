//! Remote capability probes against a target account.
//!
//! Wraps the three read-only questions the authenticator may ask a contract:
//! - ERC-165: does it declare interface X?
//! - ERC-1271: is this signature valid for this hash?
//! - ERC-725: does this key hold purpose P?
//!
//! Each probe is exactly one [`ContractCaller::read_contract_state`] call, guarded by
//! the shared [`CallContext`].

use alloy_primitives::{Address, B256, Bytes, FixedBytes, U256};
use alloy_sol_types::SolCall;
#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::caller::{CallContext, ContractCaller};
use crate::config::SignatureStandard;
use crate::contract::{
    ERC725_CORE_INTERFACE_ID, ERC725_INTERFACE_ID, IERC165, IERC725Core, IERC1271,
    IERC1271Legacy,
};
use crate::error::CapabilityError;
use crate::signature::RawSignature;

/// Awaits a future, optionally instrumenting it with a tracing span.
macro_rules! traced {
    ($fut:expr, $span:expr) => {{
        #[cfg(feature = "telemetry")]
        {
            use tracing::Instrument;
            $fut.instrument($span).await
        }
        #[cfg(not(feature = "telemetry"))]
        {
            $fut.await
        }
    }};
}

/// Probes one target account through a [`ContractCaller`].
#[derive(Debug, Clone, Copy)]
pub struct CapabilityClient<'a, C> {
    caller: &'a C,
    ctx: &'a CallContext,
    target: Address,
}

impl<'a, C: ContractCaller> CapabilityClient<'a, C> {
    /// Creates a client for `target`; every read uses `ctx`.
    pub const fn new(caller: &'a C, ctx: &'a CallContext, target: Address) -> Self {
        Self {
            caller,
            ctx,
            target,
        }
    }

    /// The account being probed.
    #[must_use]
    pub const fn target(&self) -> Address {
        self.target
    }

    /// Encodes `call`, reads it from the target and decodes the return value.
    async fn read<Call: SolCall>(&self, call: &Call) -> Result<Call::Return, CapabilityError> {
        let call_data = Bytes::from(call.abi_encode());
        let read = self
            .ctx
            .guard(self.caller.read_contract_state(self.target, call_data, self.ctx));
        let data = traced!(
            read,
            tracing::info_span!(
                "read_contract_state",
                contract = %self.target,
                method = Call::SIGNATURE,
                block = %self.ctx.block,
                otel.kind = "client",
            )
        )?;
        Ok(Call::abi_decode_returns(&data)?)
    }

    /// Calls `isValidSignature` under `standard` and returns the raw 4-byte answer.
    ///
    /// `hash` is the bare contract digest; under [`SignatureStandard::Erc1271Legacy`]
    /// it is passed as 32 bytes of `bytes` data. `signature` goes out unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if the read fails or the answer does not decode.
    pub async fn is_valid_signature(
        &self,
        standard: SignatureStandard,
        hash: B256,
        signature: &RawSignature,
    ) -> Result<FixedBytes<4>, CapabilityError> {
        let signature = signature.as_bytes().clone();
        match standard {
            SignatureStandard::Erc1271 => {
                self.read(&IERC1271::isValidSignatureCall { hash, signature })
                    .await
            }
            SignatureStandard::Erc1271Legacy => {
                let data = Bytes::copy_from_slice(hash.as_slice());
                self.read(&IERC1271Legacy::isValidSignatureCall { data, signature })
                    .await
            }
        }
    }

    /// Whether the target accepts `signature` over `hash`, i.e. answers with the
    /// magic value of `standard`. Any other answer is a rejection.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if the read fails or the answer does not decode.
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
        contract = %self.target,
        standard = ?standard,
    )))]
    pub async fn accepts_signature(
        &self,
        standard: SignatureStandard,
        hash: B256,
        signature: &RawSignature,
    ) -> Result<bool, CapabilityError> {
        let magic_value = self.is_valid_signature(standard, hash, signature).await?;
        Ok(magic_value == standard.magic_value())
    }

    /// ERC-165 `supportsInterface(interface_id)`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if the read fails or the answer does not decode.
    pub async fn supports_interface(
        &self,
        interface_id: FixedBytes<4>,
    ) -> Result<bool, CapabilityError> {
        self.read(&IERC165::supportsInterfaceCall {
            interfaceId: interface_id,
        })
        .await
    }

    /// Returns the first ERC-725 interface the target declares, probing the core
    /// interface before the full one. `None` means the target is not an identity.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] on the first probe that cannot be evaluated.
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(contract = %self.target)))]
    pub async fn identity_interface(&self) -> Result<Option<FixedBytes<4>>, CapabilityError> {
        for interface_id in [ERC725_CORE_INTERFACE_ID, ERC725_INTERFACE_ID] {
            if self.supports_interface(interface_id).await? {
                return Ok(Some(interface_id));
            }
        }
        Ok(None)
    }

    /// ERC-725 `keyHasPurpose(key, purpose)`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError`] if the read fails or the answer does not decode.
    #[cfg_attr(feature = "telemetry", instrument(skip_all, err, fields(
        contract = %self.target,
        key = %key,
        purpose = %purpose,
    )))]
    pub async fn key_has_purpose(&self, key: B256, purpose: U256) -> Result<bool, CapabilityError> {
        self.read(&IERC725Core::keyHasPurposeCall { key, purpose })
            .await
    }
}
