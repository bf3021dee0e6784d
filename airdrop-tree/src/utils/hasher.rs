//! Hashing utilities for airdrop trees.
//!
//! This module provides:
//! - The [`NodeHasher`] trait every tree is generic over
//! - Keccak-256 ([`Keccak256Hasher`]) for EVM verifiers, the default
//! - SHA-256 ([`Sha256Hasher`]) for verifiers without a Keccak precompile
//! - The sorted-pair combination rule shared by construction and verification
//!
//! # Pair rule
//! Two sibling hashes `a` and `b` are combined as `H(min(a, b) || max(a, b))`,
//! comparing the 32-byte values as big-endian unsigned integers. A verifier
//! therefore never needs to know whether a sibling sat on the left or on the
//! right. This is the same rule as OpenZeppelin's `MerkleProof.processProof`.

use sha2::Sha256;
use sha3::{Digest, Keccak256};

use crate::def::HASH_LEN;

/// Type alias for a 32-byte hash value.
/// Used for leaves, internal nodes, roots and proof siblings.
pub type Hash32 = [u8; HASH_LEN];

/// A hash function able to build and verify airdrop trees.
///
/// Implementors only provide [`NodeHasher::hash`] and [`NodeHasher::hash2`];
/// the pair rule is fixed by [`NodeHasher::hash_pair`] and must not be
/// overridden, since external verifiers re-implement it independently.
pub trait NodeHasher: Send + Sync + 'static {
    /// Short name used in logs and configuration.
    const NAME: &'static str;

    /// Hashes a single byte string.
    fn hash<T: AsRef<[u8]>>(a: T) -> Hash32;

    /// Hashes the concatenation `a || b`.
    fn hash2<T: AsRef<[u8]>>(a: T, b: T) -> Hash32;

    /// Hashes two values with optional order swapping.
    ///
    /// # Arguments
    /// * `a` - First value to hash
    /// * `b` - Second value to hash
    /// * `exchange_ab` - Whether to hash `b || a` instead of `a || b`
    fn hash2x<T: AsRef<[u8]>>(a: T, b: T, exchange_ab: bool) -> Hash32 {
        if exchange_ab {
            Self::hash2(b, a)
        } else {
            Self::hash2(a, b)
        }
    }

    /// Combines two sibling nodes with the sorted-pair rule.
    ///
    /// # Returns
    /// `hash2(min(a, b), max(a, b))`
    fn hash_pair(a: &Hash32, b: &Hash32) -> Hash32 {
        Self::hash2x(a, b, a > b)
    }
}

/// Keccak-256 (the pre-standard SHA-3 padding used by Ethereum).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keccak256Hasher;

impl NodeHasher for Keccak256Hasher {
    const NAME: &'static str = "keccak256";

    fn hash<T: AsRef<[u8]>>(a: T) -> Hash32 {
        let mut hasher = Keccak256::new();
        hasher.update(a);
        hasher.finalize().into()
    }

    fn hash2<T: AsRef<[u8]>>(a: T, b: T) -> Hash32 {
        Keccak256::new()
            .chain_update(a)
            .chain_update(b)
            .finalize()
            .into()
    }
}

/// SHA-256.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sha256Hasher;

impl NodeHasher for Sha256Hasher {
    const NAME: &'static str = "sha256";

    fn hash<T: AsRef<[u8]>>(a: T) -> Hash32 {
        let mut hasher = Sha256::new();
        hasher.update(a);
        hasher.finalize().into()
    }

    fn hash2<T: AsRef<[u8]>>(a: T, b: T) -> Hash32 {
        let mut hasher = Sha256::new();
        hasher.update(a);
        hasher.update(b);
        hasher.finalize().into()
    }
}

/// Computes the Keccak-256 hash of a single value.
pub fn keccak256<T: AsRef<[u8]>>(a: T) -> Hash32 {
    Keccak256Hasher::hash(a)
}

/// Computes the SHA-256 hash of a single value.
pub fn sha256<T: AsRef<[u8]>>(a: T) -> Hash32 {
    Sha256Hasher::hash(a)
}
