//! Error types for signature authorization.
//!
//! Failures come from two independent places: the local recovery attempt and the
//! remote contract probe. A local failure is expected for contract accounts and only
//! becomes visible when the remote side also fails, in which case both reasons are
//! reported together as [`AuthError::BothFlows`].

use std::time::Duration;

/// Coarse classification of an [`AuthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad hex or a wrong-length input; nothing was hashed.
    MalformedInput,
    /// Local public-key recovery failed and no remote check could stand in for it.
    RecoveryFailure,
    /// The contract caller failed, timed out or was cancelled.
    TransportFailure,
    /// A contract response did not match the expected ABI shape.
    DecodeFailure,
}

/// Rejected caller input.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// The field is not valid hex.
    #[error("{field} is not valid hex")]
    InvalidHex {
        /// Name of the offending input.
        field: &'static str,
    },
    /// The field decoded to an unexpected number of bytes.
    #[error("{field} must be {expected}, got {actual} bytes")]
    InvalidLength {
        /// Name of the offending input.
        field: &'static str,
        /// Human-readable expected length.
        expected: &'static str,
        /// Actual decoded length.
        actual: usize,
    },
}

/// Local public-key recovery could not produce a key.
///
/// For contract accounts this is the normal outcome and triggers the remote check.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    /// The blob holds several concatenated signatures, which only a contract can check.
    #[error("expected a single 65-byte signature, got {len} bytes")]
    NotSingleSignature {
        /// Length of the signature blob.
        len: usize,
    },
    /// `v` was outside `{27, 28}` before normalization.
    #[error("invalid recovery id {0} after normalization")]
    InvalidRecoveryId(u8),
    /// The curve rejected the signature (zero `r`/`s`, point not on curve, ...).
    #[error(transparent)]
    Ecdsa(#[from] alloy_primitives::SignatureError),
}

/// A remote contract probe could not be evaluated.
#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    /// The contract caller returned an error (network failure, revert, ...).
    #[error("contract call failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
    /// The returned bytes did not decode as the expected return type.
    #[error("could not decode contract response: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    /// The caller's cancellation token fired while the call was in flight.
    #[error("contract call cancelled")]
    Cancelled,
    /// The call did not complete within the configured timeout.
    #[error("contract call timed out after {0:?}")]
    Timeout(Duration),
}

impl CapabilityError {
    /// Wraps an arbitrary transport error.
    pub fn transport<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(error))
    }

    /// Returns the [`ErrorKind`] of this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Decode(_) => ErrorKind::DecodeFailure,
            Self::Transport(_) | Self::Cancelled | Self::Timeout(_) => {
                ErrorKind::TransportFailure
            }
        }
    }
}

/// Errors returned by the [`Authenticator`](crate::Authenticator) procedures.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Input rejected before any hashing.
    #[error("malformed input: {0}")]
    MalformedInput(#[from] InputError),
    /// Local recovery failed where no remote fallback applies.
    #[error("signer recovery failed: {0}")]
    Recovery(#[source] RecoveryError),
    /// The contract path failed after local recovery produced a non-matching signer.
    #[error(transparent)]
    Contract(#[from] CapabilityError),
    /// Both the local and the contract path failed.
    #[error(
        "authorization check errored in both flows: externally-owned account check failed with: {eoa}; contract account check failed with: {contract}"
    )]
    BothFlows {
        /// Why local recovery failed.
        eoa: RecoveryError,
        /// Why the contract probe failed.
        #[source]
        contract: CapabilityError,
    },
}

impl AuthError {
    /// Merges an optional local recovery failure with a contract-side failure.
    pub(crate) fn merge(eoa: Option<RecoveryError>, contract: CapabilityError) -> Self {
        match eoa {
            Some(eoa) => Self::BothFlows { eoa, contract },
            None => Self::Contract(contract),
        }
    }

    /// Returns the [`ErrorKind`] of this error.
    ///
    /// For [`AuthError::BothFlows`] this is the kind of the contract-side failure,
    /// since that is the one that made the outcome undecidable.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::Recovery(_) => ErrorKind::RecoveryFailure,
            Self::Contract(contract) | Self::BothFlows { contract, .. } => contract.kind(),
        }
    }

    /// Returns the local recovery failure, if one contributed to this error.
    #[must_use]
    pub const fn eoa_failure(&self) -> Option<&RecoveryError> {
        match self {
            Self::Recovery(eoa) | Self::BothFlows { eoa, .. } => Some(eoa),
            Self::MalformedInput(_) | Self::Contract(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_without_eoa_failure() {
        let err = AuthError::merge(None, CapabilityError::Cancelled);
        assert!(matches!(err, AuthError::Contract(CapabilityError::Cancelled)));
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(err.eoa_failure().is_none());
    }

    #[test]
    fn test_merge_with_eoa_failure() {
        let err = AuthError::merge(
            Some(RecoveryError::InvalidRecoveryId(229)),
            CapabilityError::Timeout(Duration::from_secs(3)),
        );
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(matches!(
            err.eoa_failure(),
            Some(RecoveryError::InvalidRecoveryId(229))
        ));
        let message = err.to_string();
        assert!(message.contains("invalid recovery id 229"));
        assert!(message.contains("timed out"));
    }

    #[test]
    fn test_decode_kind() {
        let decode = alloy_sol_types::Error::Overrun;
        let err = AuthError::from(CapabilityError::from(decode));
        assert_eq!(err.kind(), ErrorKind::DecodeFailure);
    }

    #[test]
    fn test_input_error_display() {
        let err = AuthError::from(InputError::InvalidLength {
            field: "address",
            expected: "20 bytes",
            actual: 3,
        });
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
        assert_eq!(
            err.to_string(),
            "malformed input: address must be 20 bytes, got 3 bytes"
        );
    }
}
