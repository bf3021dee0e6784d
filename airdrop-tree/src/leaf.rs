//! Canonical leaf encoding for airdrop records.
//!
//! Every record is encoded exactly like Solidity's
//! `abi.encodePacked(uint256 index, address account, uint256 amount)`:
//!
//! ```text
//! offset  0..32   index,   big-endian, left-padded with zeros
//! offset 32..52   account, 20 raw bytes
//! offset 52..84   amount,  big-endian, left-padded with zeros
//! ```
//!
//! and the leaf is `H(encoding)`, with `H` the tree's [`NodeHasher`].
//!
//! Encoding the index makes leaves unique even when an account appears twice,
//! and lets the claim contract key its claimed-bitmap by index. Changing any
//! part of this layout changes every root and proof ever published, so it is
//! fixed.
//!
//! The 84-byte preimage also keeps leaves apart from internal nodes, whose
//! preimage is always 64 bytes.

use byteorder::{BigEndian, ByteOrder};

use crate::def::{ACCOUNT_LEN, PACKED_RECORD_LEN, UINT256_LEN};
use crate::error::HexError;
use crate::utils::hasher::{Hash32, NodeHasher};
use crate::utils::hexfmt;

/// A 20-byte EVM account address.
pub type Account = [u8; ACCOUNT_LEN];

/// One entitlement: `amount` tokens claimable by `account` at slot `index`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    pub index: u64,
    pub account: Account,
    pub amount: u128,
}

impl Record {
    pub fn new(index: u64, account: Account, amount: u128) -> Self {
        Self {
            index,
            account,
            amount,
        }
    }

    /// Returns the packed preimage of this record's leaf.
    pub fn encode_packed(&self) -> [u8; PACKED_RECORD_LEN] {
        encode_packed(self.index, &self.account, self.amount)
    }

    /// Returns this record's leaf hash.
    pub fn leaf<H: NodeHasher>(&self) -> Hash32 {
        leaf_hash::<H>(self.index, &self.account, self.amount)
    }
}

/// Encodes `(index, account, amount)` as `abi.encodePacked(uint256, address, uint256)`.
pub fn encode_packed(index: u64, account: &Account, amount: u128) -> [u8; PACKED_RECORD_LEN] {
    let mut bz = [0u8; PACKED_RECORD_LEN];
    BigEndian::write_u64(&mut bz[UINT256_LEN - 8..UINT256_LEN], index);
    bz[UINT256_LEN..UINT256_LEN + ACCOUNT_LEN].copy_from_slice(account);
    BigEndian::write_u128(&mut bz[PACKED_RECORD_LEN - 16..], amount);
    bz
}

/// Computes the leaf for `(index, account, amount)`.
pub fn leaf_hash<H: NodeHasher>(index: u64, account: &Account, amount: u128) -> Hash32 {
    H::hash(encode_packed(index, account, amount))
}

/// Parses a hex account address, `0x` prefix optional.
///
/// No EIP-55 checksum validation is done; mixed case is accepted as is.
pub fn parse_account(s: &str) -> Result<Account, HexError> {
    hexfmt::decode_fixed::<ACCOUNT_LEN>(s)
}

/// Formats an account as lowercase `0x`-prefixed hex.
pub fn format_account(account: &Account) -> String {
    hexfmt::encode_0x(account)
}
