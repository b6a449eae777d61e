//! In-memory contract wallet and wallet-side signing helpers.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy_primitives::{Address, B256, Bytes, FixedBytes, hex, keccak256};
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::{SolCall, SolValue};
use dappauth::contract::{
    ACTION_PURPOSE, ERC725_CORE_INTERFACE_ID, ERC725_INTERFACE_ID, IERC165, IERC725Core,
    IERC1271, IERC1271Legacy,
};
use dappauth::hash::{ChallengeHashes, erc191_data_hash};
use dappauth::recovery::recover_signer;
use dappauth::{BlockContext, CallContext, ContractCaller, RawSignature, SignatureStandard};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// A contract account answering ERC-1271, ERC-165 and ERC-725 reads from memory.
#[derive(Debug, Default)]
pub struct MockContract {
    /// Address the wallet is deployed at; part of the ERC-191 hash it checks.
    pub address: Address,
    /// The single key allowed to sign for the wallet.
    pub authorized_signer: Option<Address>,
    /// Which `isValidSignature` ABI the wallet implements.
    pub standard: SignatureStandard,
    pub error_on_is_valid_signature: bool,
    pub supports_erc725_core: bool,
    pub supports_erc725: bool,
    /// Key identifier registered with the `ACTION` purpose.
    pub actionable_key: Option<B256>,
    pub error_on_supports_interface: bool,
    pub error_on_key_has_purpose: bool,
    /// Artificial latency per read.
    pub delay: Option<Duration>,
    calls: AtomicUsize,
    reads: Mutex<Vec<(Address, BlockContext)>>,
}

impl MockContract {
    pub fn wallet(address: Address, authorized_signer: Option<Address>) -> Self {
        Self {
            address,
            authorized_signer,
            ..Self::default()
        }
    }

    pub fn identity(core: bool, full: bool, actionable_key: Option<B256>) -> Self {
        Self {
            supports_erc725_core: core,
            supports_erc725: full,
            actionable_key,
            ..Self::default()
        }
    }

    /// Number of reads that reached the contract.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Target address and block of every read, in order.
    pub fn reads(&self) -> Vec<(Address, BlockContext)> {
        self.reads.lock().unwrap().clone()
    }

    fn check_signature(&self, hash: &[u8], signature: &Bytes) -> Result<bool, MockError> {
        if self.error_on_is_valid_signature {
            return Err(MockError("isValidSignature reverted".into()));
        }
        let first = signature
            .get(..65)
            .ok_or_else(|| MockError("signature too short".into()))?;
        let first = RawSignature::try_from(Bytes::copy_from_slice(first))
            .map_err(|e| MockError(e.to_string()))?;
        let recovered = recover_signer(&erc191_data_hash(self.address, hash), &first)
            .map_err(|e| MockError(e.to_string()))?;
        Ok(self.authorized_signer == Some(recovered.address))
    }

    fn magic_word(&self, accepted: bool) -> Bytes {
        let word = if accepted {
            self.standard.magic_value()
        } else {
            FixedBytes::ZERO
        };
        Bytes::from(word.abi_encode())
    }

    fn dispatch(&self, call_data: &[u8]) -> Result<Bytes, MockError> {
        let selector = call_data
            .get(..4)
            .ok_or_else(|| MockError("missing selector".into()))?;
        let decode_error = |e: alloy_sol_types::Error| MockError(e.to_string());

        if selector == IERC1271::isValidSignatureCall::SELECTOR
            && self.standard == SignatureStandard::Erc1271
        {
            let call = IERC1271::isValidSignatureCall::abi_decode(call_data).map_err(decode_error)?;
            let accepted = self.check_signature(call.hash.as_slice(), &call.signature)?;
            Ok(self.magic_word(accepted))
        } else if selector == IERC1271Legacy::isValidSignatureCall::SELECTOR
            && self.standard == SignatureStandard::Erc1271Legacy
        {
            let call =
                IERC1271Legacy::isValidSignatureCall::abi_decode(call_data).map_err(decode_error)?;
            let accepted = self.check_signature(&call.data, &call.signature)?;
            Ok(self.magic_word(accepted))
        } else if selector == IERC165::supportsInterfaceCall::SELECTOR {
            if self.error_on_supports_interface {
                return Err(MockError("supportsInterface reverted".into()));
            }
            let call = IERC165::supportsInterfaceCall::abi_decode(call_data).map_err(decode_error)?;
            let supported = (self.supports_erc725_core
                && call.interfaceId == ERC725_CORE_INTERFACE_ID)
                || (self.supports_erc725 && call.interfaceId == ERC725_INTERFACE_ID);
            Ok(Bytes::from(supported.abi_encode()))
        } else if selector == IERC725Core::keyHasPurposeCall::SELECTOR {
            if self.error_on_key_has_purpose {
                return Err(MockError("keyHasPurpose reverted".into()));
            }
            let call = IERC725Core::keyHasPurposeCall::abi_decode(call_data).map_err(decode_error)?;
            let has_purpose =
                call.purpose == ACTION_PURPOSE && self.actionable_key == Some(call.key);
            Ok(Bytes::from(has_purpose.abi_encode()))
        } else {
            Err(MockError(format!("unexpected method {}", hex::encode(selector))))
        }
    }
}

impl ContractCaller for MockContract {
    type Error = MockError;

    async fn read_contract_state(
        &self,
        to: Address,
        call_data: Bytes,
        ctx: &CallContext,
    ) -> Result<Bytes, Self::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reads.lock().unwrap().push((to, ctx.block));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.dispatch(&call_data)
    }
}

/// What an EOA wallet produces for `personal_sign(challenge)`.
pub fn sign_personal(signer: &PrivateKeySigner, challenge: &str) -> String {
    let hash = ChallengeHashes::new(challenge).personal;
    let signature = signer.sign_hash_sync(&hash).unwrap();
    hex::encode_prefixed(signature.as_bytes())
}

/// What a key of the contract wallet at `wallet` signs for `challenge`.
pub fn sign_for_wallet(signer: &PrivateKeySigner, challenge: &str, wallet: Address) -> String {
    let data = ChallengeHashes::new(challenge).contract;
    let hash = erc191_data_hash(wallet, data.as_slice());
    let signature = signer.sign_hash_sync(&hash).unwrap();
    hex::encode(signature.as_bytes())
}

/// ERC-725 key identifier of `signer`.
pub fn key_id(signer: &PrivateKeySigner) -> B256 {
    let public_key = signer.credential().verifying_key().to_encoded_point(false);
    keccak256(&public_key.as_bytes()[1..])
}
