//! The airdrop Merkle tree.
//!
//! A [`MerkleTree`] is built once from an ordered list of 32-byte leaves and is
//! read-only afterwards. Layers are stored bottom-up:
//!
//! ```text
//!   layer 2:            root
//!                     /      \
//!   layer 1:     p(L0,L1)     L2        <- L2 has no sibling, promoted as is
//!               /      \       |
//!   layer 0:   L0      L1     L2
//! ```
//!
//! Construction rules:
//! - Siblings combine with [`NodeHasher::hash_pair`] (sorted pair).
//! - An unpaired last node is promoted unchanged, never paired with itself.
//! - A single leaf is its own root.
//! - Zero leaves is an error.

use std::collections::HashMap;
use std::marker::PhantomData;

use log::debug;

use super::proof::{self, Proof};
use crate::error::{HexError, MerkleError};
use crate::utils::hasher::{Hash32, Keccak256Hasher, NodeHasher};
use crate::utils::hexfmt;

/// An immutable Merkle tree over 32-byte leaves.
///
/// The tree owns every layer, so proofs are answered without rehashing.
/// It has no interior mutability and is `Send + Sync`; share it across
/// threads through `&MerkleTree` or `Arc<MerkleTree>`.
#[derive(Clone, Debug)]
pub struct MerkleTree<H: NodeHasher = Keccak256Hasher> {
    layers: Vec<Vec<Hash32>>,
    // first position of each distinct leaf
    positions: HashMap<Hash32, usize>,
    _hasher: PhantomData<fn() -> H>,
}

impl<H: NodeHasher> MerkleTree<H> {
    /// Builds a tree from leaf hashes in their given order.
    ///
    /// # Errors
    /// Returns [`MerkleError::EmptyInput`] if `leaves` is empty.
    pub fn from_leaves(leaves: Vec<Hash32>) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyInput);
        }

        let mut positions = HashMap::with_capacity(leaves.len());
        for (i, leaf) in leaves.iter().enumerate() {
            positions.entry(*leaf).or_insert(i);
        }

        let layers = build_layers::<H>(leaves);
        debug!(
            "built {} tree: leaves={} distinct={} layers={}",
            H::NAME,
            layers[0].len(),
            positions.len(),
            layers.len()
        );

        Ok(Self {
            layers,
            positions,
            _hasher: PhantomData,
        })
    }

    /// Builds a tree from untyped byte strings.
    ///
    /// Every item is checked before any hashing happens.
    ///
    /// # Errors
    /// * [`MerkleError::EmptyInput`] if `items` is empty
    /// * [`MerkleError::MalformedLeaf`] for the first item that is not 32 bytes
    pub fn from_slices<T: AsRef<[u8]>>(items: &[T]) -> Result<Self, MerkleError> {
        let mut leaves = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let bz = item.as_ref();
            let leaf: Hash32 = bz.try_into().map_err(|_| MerkleError::MalformedLeaf {
                position,
                len: bz.len(),
            })?;
            leaves.push(leaf);
        }
        Self::from_leaves(leaves)
    }

    /// Builds a tree from hex-encoded leaves (`0x` prefix optional).
    ///
    /// # Errors
    /// * [`MerkleError::EmptyInput`] if `items` is empty
    /// * [`MerkleError::MalformedLeaf`] if an item does not decode to 32 bytes
    /// * [`MerkleError::MalformedHex`] if an item holds non-hex characters
    pub fn from_hex<S: AsRef<str>>(items: &[S]) -> Result<Self, MerkleError> {
        let mut leaves = Vec::with_capacity(items.len());
        for (position, item) in items.iter().enumerate() {
            let leaf = hexfmt::decode_hash(item.as_ref()).map_err(|e| match e {
                HexError::InvalidLength { actual, .. } => {
                    MerkleError::MalformedLeaf {
                        position,
                        len: actual,
                    }
                }
                source => MerkleError::MalformedHex { position, source },
            })?;
            leaves.push(leaf);
        }
        Self::from_leaves(leaves)
    }

    /// Returns the root hash.
    pub fn root(&self) -> Hash32 {
        self.layers[self.layers.len() - 1][0]
    }

    /// Returns the root hash as `0x`-prefixed hex.
    pub fn root_hex(&self) -> String {
        hexfmt::encode_0x(self.root())
    }

    /// Returns the inclusion proof for a leaf value.
    ///
    /// If the same leaf occurs more than once, the proof for its first
    /// position is returned. Its length may be shorter than `depth() - 1`
    /// when the leaf was promoted without a sibling on some layer.
    ///
    /// # Errors
    /// Returns [`MerkleError::LeafNotFound`] if `leaf` is not in layer 0.
    pub fn proof(&self, leaf: &Hash32) -> Result<Proof, MerkleError> {
        let index = self
            .position(leaf)
            .ok_or(MerkleError::LeafNotFound { leaf: *leaf })?;
        self.proof_at(index)
    }

    /// Returns the inclusion proof for the leaf at `index`.
    ///
    /// # Errors
    /// Returns [`MerkleError::IndexOutOfRange`] if `index >= leaf_count()`.
    pub fn proof_at(&self, index: usize) -> Result<Proof, MerkleError> {
        let len = self.leaf_count();
        if index >= len {
            return Err(MerkleError::IndexOutOfRange { index, len });
        }

        let mut siblings = Vec::with_capacity(self.layers.len() - 1);
        let mut idx = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let pair_idx = idx ^ 1;
            if pair_idx < layer.len() {
                siblings.push(layer[pair_idx]);
            }
            idx >>= 1;
        }
        Ok(Proof::new(siblings))
    }

    /// Checks a proof against this tree's root.
    pub fn verify(&self, leaf: &Hash32, proof: &Proof) -> bool {
        proof::verify::<H>(leaf, proof.siblings(), &self.root())
    }

    /// Returns the first position of `leaf` in layer 0.
    pub fn position(&self, leaf: &Hash32) -> Option<usize> {
        self.positions.get(leaf).copied()
    }

    pub fn contains(&self, leaf: &Hash32) -> bool {
        self.positions.contains_key(leaf)
    }

    pub fn leaves(&self) -> &[Hash32] {
        &self.layers[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.layers[0].len()
    }

    /// Number of layers, including the leaf layer and the root layer.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// All layers, leaves first, root last.
    pub fn layers(&self) -> &[Vec<Hash32>] {
        &self.layers
    }

    pub fn layer(&self, level: usize) -> Option<&[Hash32]> {
        self.layers.get(level).map(Vec::as_slice)
    }
}

/// Computes the layer above `layer`.
///
/// Pairs `(0,1), (2,3), ...` are combined with the sorted-pair rule; a last
/// unpaired node is promoted unchanged.
pub fn next_layer<H: NodeHasher>(layer: &[Hash32]) -> Vec<Hash32> {
    layer
        .chunks(2)
        .map(|pair| match pair {
            [a, b] => H::hash_pair(a, b),
            _ => pair[0],
        })
        .collect()
}

fn build_layers<H: NodeHasher>(leaves: Vec<Hash32>) -> Vec<Vec<Hash32>> {
    let mut layers = vec![leaves];
    loop {
        let top = &layers[layers.len() - 1];
        if top.len() <= 1 {
            break;
        }
        let next = next_layer::<H>(top);
        layers.push(next);
    }
    layers
}
