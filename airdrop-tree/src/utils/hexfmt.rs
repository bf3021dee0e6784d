//! `0x`-prefixed hex transport for fixed-size values.
//!
//! Roots, proofs and accounts leave the crate as lowercase hex strings with a
//! `0x` prefix. Decoding accepts the prefix as optional and is case-insensitive.

use crate::error::HexError;
use crate::utils::hasher::Hash32;

/// Encodes bytes as a `0x`-prefixed lowercase hex string.
pub fn encode_0x<T: AsRef<[u8]>>(bytes: T) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decodes a hex string into exactly `N` bytes.
///
/// # Errors
/// * [`HexError::InvalidLength`] if the string does not hold `N` bytes
/// * [`HexError::InvalidHex`] if it contains non-hex characters
pub fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], HexError> {
    let digits = strip_0x(s.trim());
    if digits.len() != 2 * N {
        return Err(HexError::InvalidLength {
            expected: N,
            actual: digits.len() / 2,
        });
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)?;
    Ok(out)
}

/// Decodes a 32-byte hash.
pub fn decode_hash(s: &str) -> Result<Hash32, HexError> {
    decode_fixed::<32>(s)
}

/// Decodes a list of 32-byte hashes, stopping at the first malformed entry.
pub fn decode_hashes<S: AsRef<str>>(items: &[S]) -> Result<Vec<Hash32>, HexError> {
    items.iter().map(|s| decode_hash(s.as_ref())).collect()
}

fn strip_0x(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Encodes a `u128` as minimal `0x`-prefixed hex, `0x0` for zero.
pub fn encode_quantity(v: u128) -> String {
    format!("{:#x}", v)
}

/// Decodes a `0x`-prefixed quantity produced by [`encode_quantity`].
pub fn decode_quantity(s: &str) -> Result<u128, HexError> {
    let digits = strip_0x(s.trim());
    // from_str_radix alone would accept a leading sign
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(HexError::InvalidQuantity(s.to_string()));
    }
    u128::from_str_radix(digits, 16).map_err(|_| HexError::InvalidQuantity(s.to_string()))
}
