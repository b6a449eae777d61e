//! Local (off-chain) signer recovery.
//!
//! This is the EOA fast path. A failure here is expected for contract accounts and
//! is returned as a [`RecoveryError`] for the caller to inspect, never as a panic.

use alloy_primitives::{Address, B256, Signature, U256, keccak256};

use crate::error::RecoveryError;
use crate::signature::RawSignature;

/// Signer recovered from a `personal_sign` signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredSigner {
    /// Address derived from the recovered public key.
    pub address: Address,
    /// Keccak-256 of the uncompressed public key without its `0x04` prefix.
    ///
    /// ERC-725 identities register keys under this identifier; the address is its
    /// low 20 bytes.
    pub key_id: B256,
}

/// Recovers the signer of `personal_hash` from a single wallet signature.
///
/// # Errors
///
/// - [`RecoveryError::NotSingleSignature`] for concatenated signatures
/// - [`RecoveryError::InvalidRecoveryId`] when `v` was not 27 or 28
/// - [`RecoveryError::Ecdsa`] when the curve rejects `r`/`s`
pub fn recover_signer(
    personal_hash: &B256,
    signature: &RawSignature,
) -> Result<RecoveredSigner, RecoveryError> {
    let adjusted = signature
        .normalized()
        .ok_or_else(|| RecoveryError::NotSingleSignature {
            len: signature.as_bytes().len(),
        })?;
    let y_parity = match adjusted[64] {
        0 => false,
        1 => true,
        v => return Err(RecoveryError::InvalidRecoveryId(v)),
    };
    let r = U256::from_be_slice(&adjusted[..32]);
    let s = U256::from_be_slice(&adjusted[32..64]);
    let key = Signature::new(r, s, y_parity).recover_from_prehash(personal_hash)?;

    let encoded = key.to_encoded_point(false);
    let key_id = keccak256(&encoded.as_bytes()[1..]);
    Ok(RecoveredSigner {
        address: Address::from_slice(&key_id[12..]),
        key_id,
    })
}
