//! Raw signature parsing and recovery-id normalization.
//!
//! Wallets emit `r ‖ s ‖ v` with `v ∈ {27, 28}`; secp256k1 recovery wants `{0, 1}`.
//! The original bytes are kept untouched because contract wallets re-derive the
//! recovery id themselves and expect the wallet form.

use alloy_primitives::Bytes;

use crate::challenge::decode_strict_hex;
use crate::error::InputError;

/// Length of a single `r ‖ s ‖ v` signature.
pub const SIGNATURE_LENGTH: usize = 65;

/// Offset added to the recovery id by wallets (yellow paper convention).
const RECOVERY_ID_OFFSET: u8 = 27;

/// One or more concatenated 65-byte signatures, exactly as the wallet produced them.
///
/// More than one signature only makes sense for multisig contract wallets; local
/// recovery is attempted on single signatures only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSignature(Bytes);

impl RawSignature {
    /// Parses a hex string, with or without `0x`.
    ///
    /// # Errors
    ///
    /// Returns [`InputError`] if the string is not hex or does not decode to a
    /// non-zero multiple of 65 bytes.
    pub fn from_hex(signature: &str) -> Result<Self, InputError> {
        let bytes = decode_strict_hex(signature).ok_or(InputError::InvalidHex {
            field: "signature",
        })?;
        Self::try_from(Bytes::from(bytes))
    }

    /// The signature bytes as received.
    #[must_use]
    pub const fn as_bytes(&self) -> &Bytes {
        &self.0
    }

    /// Number of concatenated signatures.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.len() / SIGNATURE_LENGTH
    }

    /// Returns a private copy with `v` shifted from `{27, 28}` to `{0, 1}`.
    ///
    /// Returns `None` unless this is exactly one signature. The subtraction wraps, so
    /// an out-of-range `v` yields an out-of-range recovery id rather than a panic.
    #[must_use]
    pub fn normalized(&self) -> Option<[u8; SIGNATURE_LENGTH]> {
        let mut adjusted = <[u8; SIGNATURE_LENGTH]>::try_from(&self.0[..]).ok()?;
        adjusted[64] = adjusted[64].wrapping_sub(RECOVERY_ID_OFFSET);
        Some(adjusted)
    }
}

impl TryFrom<Bytes> for RawSignature {
    type Error = InputError;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        if bytes.is_empty() || bytes.len() % SIGNATURE_LENGTH != 0 {
            return Err(InputError::InvalidLength {
                field: "signature",
                expected: "a non-zero multiple of 65 bytes",
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }
}

impl From<RawSignature> for Bytes {
    fn from(signature: RawSignature) -> Self {
        signature.0
    }
}
