//! Wire-level constants shared with external verifiers.

/// Length of every leaf, node, root and proof sibling.
pub const HASH_LEN: usize = 32;

/// Length of an EVM account address.
pub const ACCOUNT_LEN: usize = 20;

/// Width of a Solidity `uint256` in packed encoding.
pub const UINT256_LEN: usize = 32;

/// Length of a packed leaf record: `uint256 index || address || uint256 amount`.
pub const PACKED_RECORD_LEN: usize = UINT256_LEN + ACCOUNT_LEN + UINT256_LEN;

/// Bits per claimed-bitmap word, matching the distributor contract's `u128` words.
pub const CLAIM_WORD_BITS: u64 = 128;

/// Default record count at which leaf hashing moves to the rayon pool.
pub const PARALLEL_HASH_THRESHOLD: usize = 4096;
