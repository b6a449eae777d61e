//! Solidity interface definitions and magic constants for on-chain checks.
//!
//! Contains the minimal ABI surface needed by the capability client:
//! - [`IERC1271`]: `isValidSignature(bytes32,bytes)`, the current ERC-1271
//! - [`IERC1271Legacy`]: `isValidSignature(bytes,bytes)`, the draft ERC-1271
//! - [`IERC165`]: interface detection
//! - [`IERC725Core`]: `keyHasPurpose` lookup on ERC-725 identities
//!
//! Every magic value is the selector of the method that defines it and is pinned
//! here as a literal; the unit tests keep the literals honest.

use alloy_primitives::{FixedBytes, U256, fixed_bytes};
use alloy_sol_types::sol;

/// Returned by [`IERC1271::isValidSignature`] to accept a signature:
/// `bytes4(keccak256("isValidSignature(bytes32,bytes)"))`.
pub const ERC1271_MAGIC_VALUE: FixedBytes<4> = fixed_bytes!("0x1626ba7e");

/// Returned by [`IERC1271Legacy::isValidSignature`] to accept a signature:
/// `bytes4(keccak256("isValidSignature(bytes,bytes)"))`.
pub const ERC1271_LEGACY_MAGIC_VALUE: FixedBytes<4> = fixed_bytes!("0x20c13b0b");

/// ERC-165 identifier of the ERC-725 core interface (`keyHasPurpose` only).
pub const ERC725_CORE_INTERFACE_ID: FixedBytes<4> = fixed_bytes!("0xd202158d");

/// ERC-165 identifier of the full ERC-725 (v1) identity interface.
pub const ERC725_INTERFACE_ID: FixedBytes<4> = fixed_bytes!("0xdc3d2a7b");

/// ERC-725 purpose code for keys allowed to act on behalf of the identity.
pub const ACTION_PURPOSE: U256 = U256::from_limbs([2, 0, 0, 0]);

sol! {
    /// ERC-1271 standard signature validation.
    ///
    /// Reference: <https://eips.ethereum.org/EIPS/eip-1271>
    #[allow(missing_docs)]
    #[derive(Debug)]
    interface IERC1271 {
        function isValidSignature(bytes32 hash, bytes signature) external view returns (bytes4 magicValue);
    }
}

sol! {
    /// Pre-final ERC-1271 draft taking arbitrary `bytes` data.
    ///
    /// Some deployed wallets still implement only this form.
    #[allow(missing_docs)]
    #[derive(Debug)]
    interface IERC1271Legacy {
        function isValidSignature(bytes data, bytes signature) external view returns (bytes4 magicValue);
    }
}

sol! {
    /// ERC-165 standard interface detection.
    ///
    /// Reference: <https://eips.ethereum.org/EIPS/eip-165>
    #[allow(missing_docs)]
    #[derive(Debug)]
    interface IERC165 {
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }
}

sol! {
    /// Read-only subset of the ERC-725 (v1) key manager.
    ///
    /// Reference: <https://github.com/ethereum/EIPs/issues/725>
    #[allow(missing_docs)]
    #[derive(Debug)]
    interface IERC725Core {
        function keyHasPurpose(bytes32 key, uint256 purpose) external view returns (bool exists);
    }
}
