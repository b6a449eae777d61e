//! Challenge canonicalization.
//!
//! Wallets disagree on whether a `0x`-looking challenge is text or hex. Following
//! the `eth-sig-util` behaviour, anything that is cleanly hex is signed as the
//! decoded bytes; everything else is signed as its UTF-8 encoding.

use alloy_primitives::hex;

/// Converts a challenge into the exact bytes a wallet signs.
///
/// An optional `0x` prefix is stripped. If what remains is an even number of ASCII
/// hex digits, the decoded bytes are returned; otherwise the UTF-8 bytes of the
/// original, unstripped challenge are returned. The empty string (and a bare `0x`)
/// decodes to zero bytes.
#[must_use]
pub fn canonicalize(challenge: &str) -> Vec<u8> {
    decode_strict_hex(challenge).unwrap_or_else(|| challenge.as_bytes().to_vec())
}

/// Decodes `input` as hex with at most one leading `0x`.
///
/// Returns `None` on any non-hex character or an odd number of digits.
pub(crate) fn decode_strict_hex(input: &str) -> Option<Vec<u8>> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    hex::decode(digits).ok()
}
