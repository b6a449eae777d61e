//! Message digests for the two signing conventions.
//!
//! - [`personal_message_hash`] is what EOA wallets sign via `personal_sign`.
//! - [`contract_message_hash`] is what gets handed to an ERC-1271 wallet, which
//!   applies its own ERC-191 wrapping before checking the signature.

use alloy_primitives::{Address, B256, Keccak256, keccak256};

use crate::challenge::canonicalize;

/// Prefix of the `personal_sign` convention (EIP-191 version `0x45`).
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Keccak-256 of `"\x19Ethereum Signed Message:\n" ++ len ++ message`,
/// with `len` rendered in decimal.
#[must_use]
pub fn personal_message_hash(message: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX);
    hasher.update(message.len().to_string().as_bytes());
    hasher.update(message);
    hasher.finalize()
}

/// Keccak-256 of the message alone.
///
/// Smart-contract wallets receive this digest as-is; wrapping it here as well would
/// make the contract check a doubly-wrapped hash.
#[must_use]
pub fn contract_message_hash(message: &[u8]) -> B256 {
    keccak256(message)
}

/// ERC-191 version `0x00` ("intended validator") digest:
/// `keccak256(0x19 ‖ 0x00 ‖ validator ‖ data)`.
///
/// This is the hash an ERC-1271 wallet at `validator` recovers signers from, so a
/// client producing a contract-wallet signature signs this over
/// [`contract_message_hash`].
#[must_use]
pub fn erc191_data_hash(validator: Address, data: &[u8]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update([0x19, 0x00]);
    hasher.update(validator);
    hasher.update(data);
    hasher.finalize()
}

/// Both digests of a challenge, computed once per verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChallengeHashes {
    /// `personal_sign` digest, used for local recovery.
    pub personal: B256,
    /// Bare digest, passed to contract wallets.
    pub contract: B256,
}

impl ChallengeHashes {
    /// Canonicalizes `challenge` and hashes the result both ways.
    #[must_use]
    pub fn new(challenge: &str) -> Self {
        let bytes = canonicalize(challenge);
        Self {
            personal: personal_message_hash(&bytes),
            contract: contract_message_hash(&bytes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, eip191_hash_message};

    #[test]
    fn test_utf8_challenge_golden() {
        let hashes = ChallengeHashes::new("foo");
        assert_eq!(
            hashes.personal,
            b256!("0x76b2e96714d3b5e6eb1d1c509265430b907b44f72b2a22b06fcd4d96372b8565")
        );
        assert_eq!(
            hashes.contract,
            b256!("0x41b1a0649752af1b28b3dc29a1556eee781e4a4c3a1f7f53f90fa834de098c4d")
        );
    }

    #[test]
    fn test_hex_challenge_golden() {
        let hashes = ChallengeHashes::new("0xffff");
        assert_eq!(
            hashes.personal,
            b256!("0x13a6aa3102b2d639f36804a2d7c31469618fd7a7907c658a7b2aa91a06e31e47")
        );
        assert_eq!(
            hashes.contract,
            b256!("0x06d41322d79dfed27126569cb9a80eb0967335bf2f3316359d2a93c779fcd38a")
        );
    }

    #[test]
    fn test_hex_challenge_differs_from_literal_text() {
        let literal = personal_message_hash(b"0xffff");
        assert_eq!(
            literal,
            b256!("0x247aefb5d2e5b17fca61f786c779f7388485460c13e51308f88b2ff84ffa6851")
        );
        assert_ne!(ChallengeHashes::new("0xffff").personal, literal);
        assert_eq!(
            contract_message_hash(b"0xffff"),
            b256!("0xf0443ea82539c5136844b0a175f544b7ee7bc0fc5ce940bad19f08eaf618af71")
        );
    }

    #[test]
    fn test_personal_hash_matches_eip191() {
        let long = [0xff_u8; 300];
        for message in [b"".as_slice(), b"foo".as_slice(), long.as_slice()] {
            assert_eq!(personal_message_hash(message), eip191_hash_message(message));
        }
    }

    #[test]
    fn test_erc191_data_hash_layout() {
        let validator = address!("0x00000000000000000000000000000000000000aa");
        let data = [0x11_u8; 32];
        let mut preimage = vec![0x19, 0x00];
        preimage.extend_from_slice(validator.as_slice());
        preimage.extend_from_slice(&data);
        assert_eq!(erc191_data_hash(validator, &data), keccak256(&preimage));
    }
}
