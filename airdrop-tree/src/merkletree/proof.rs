//! Inclusion proofs and stateless verification.
//!
//! A proof is the list of sibling hashes met on the way from a leaf to the
//! root, bottom-up. Because siblings combine with the sorted-pair rule, the
//! proof carries no left/right flags and verification is a plain fold:
//!
//! ```text
//! h = leaf
//! for s in proof: h = H(min(h, s) || max(h, s))
//! valid  <=>  h == root
//! ```
//!
//! [`verify`] needs nothing but the leaf, the proof and the published root,
//! which is what an on-chain verifier holds.

use serde::{Deserialize, Serialize};

use crate::error::HexError;
use crate::utils::hasher::{Hash32, NodeHasher};
use crate::utils::hexfmt;

/// Sibling hashes from a leaf up to, but not including, the root.
///
/// Serializes as a JSON array of `0x`-prefixed hex strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<String>", try_from = "Vec<String>")]
pub struct Proof {
    siblings: Vec<Hash32>,
}

impl Proof {
    pub fn new(siblings: Vec<Hash32>) -> Self {
        Self { siblings }
    }

    pub fn siblings(&self) -> &[Hash32] {
        &self.siblings
    }

    pub fn into_siblings(self) -> Vec<Hash32> {
        self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Recomputes the root implied by `leaf` and this proof.
    pub fn compute_root<H: NodeHasher>(&self, leaf: &Hash32) -> Hash32 {
        process_proof::<H>(leaf, &self.siblings)
    }

    /// Returns true iff this proof links `leaf` to `root`.
    pub fn verify<H: NodeHasher>(&self, leaf: &Hash32, root: &Hash32) -> bool {
        verify::<H>(leaf, &self.siblings, root)
    }

    /// Encodes every sibling as `0x`-prefixed hex.
    pub fn to_hex(&self) -> Vec<String> {
        self.siblings.iter().map(hexfmt::encode_0x).collect()
    }

    /// Decodes a proof from hex strings (`0x` prefix optional).
    pub fn from_hex<S: AsRef<str>>(items: &[S]) -> Result<Self, HexError> {
        Ok(Self::new(hexfmt::decode_hashes(items)?))
    }
}

impl From<Vec<Hash32>> for Proof {
    fn from(siblings: Vec<Hash32>) -> Self {
        Self::new(siblings)
    }
}

impl From<Proof> for Vec<String> {
    fn from(proof: Proof) -> Self {
        proof.to_hex()
    }
}

impl TryFrom<Vec<String>> for Proof {
    type Error = HexError;

    fn try_from(items: Vec<String>) -> Result<Self, Self::Error> {
        Self::from_hex(&items)
    }
}

impl AsRef<[Hash32]> for Proof {
    fn as_ref(&self) -> &[Hash32] {
        &self.siblings
    }
}

/// Folds `proof` into `leaf` with the sorted-pair rule.
pub fn process_proof<H: NodeHasher>(leaf: &Hash32, proof: &[Hash32]) -> Hash32 {
    proof
        .iter()
        .fold(*leaf, |computed, sibling| H::hash_pair(&computed, sibling))
}

/// Returns true iff folding `proof` into `leaf` yields `expected_root`.
///
/// An empty proof is valid exactly when the leaf is the root (single-leaf tree).
pub fn verify<H: NodeHasher>(leaf: &Hash32, proof: &[Hash32], expected_root: &Hash32) -> bool {
    process_proof::<H>(leaf, proof) == *expected_root
}
