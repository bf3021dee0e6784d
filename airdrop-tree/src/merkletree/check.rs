//! Verification utilities for tree consistency checking.
//!
//! This module re-derives every layer of a built tree and checks that:
//! 1. Each layer is `ceil(len / 2)` wide relative to the one below
//! 2. Each paired node equals the sorted-pair hash of its children
//! 3. Each unpaired last node equals its promoted child
//! 4. The top layer holds exactly one node, the root

use super::tree::MerkleTree;
use crate::utils::hasher::{Hash32, NodeHasher};

/// Verifies that two hash values are equal.
///
/// # Arguments
/// * `tag` - A string identifier for the comparison (used in error messages)
/// * `a` - First hash value
/// * `b` - Second hash value
///
/// # Panics
/// Panics if the hash values don't match
pub fn hash_equal(tag: &str, a: &[u8], b: &[u8]) {
    if !a.eq(b) {
        panic!(
            "{} not equal: 0x{} vs 0x{}",
            tag,
            hex::encode(a),
            hex::encode(b)
        );
    }
}

/// Checks one parent layer against the child layer below it.
///
/// # Arguments
/// * `level` - Index of the child layer (for error messages)
/// * `child` - The lower layer
/// * `parent` - The layer built from `child`
///
/// # Returns
/// A description of the first mismatch, if any
pub fn check_layer<H: NodeHasher>(
    level: usize,
    child: &[Hash32],
    parent: &[Hash32],
) -> Result<(), String> {
    if parent.len() != child.len().div_ceil(2) {
        return Err(format!(
            "layer {} has {} nodes, expected {}",
            level + 1,
            parent.len(),
            child.len().div_ceil(2)
        ));
    }
    for (i, node) in parent.iter().enumerate() {
        let expected = match child.get(2 * i + 1) {
            Some(right) => H::hash_pair(&child[2 * i], right),
            None => child[2 * i],
        };
        if *node != expected {
            return Err(format!(
                "mismatch at {}-{} l:{} r:{}",
                level + 1,
                i,
                2 * i,
                2 * i + 1
            ));
        }
    }
    Ok(())
}

/// Checks a whole stack of layers, leaves first.
pub fn check_layers<H: NodeHasher>(layers: &[Vec<Hash32>]) -> Result<(), String> {
    match layers.last() {
        None => return Err("no layers".to_string()),
        Some(top) if top.len() != 1 => {
            return Err(format!("top layer has {} nodes", top.len()));
        }
        _ => {}
    }
    for (level, pair) in layers.windows(2).enumerate() {
        check_layer::<H>(level, &pair[0], &pair[1])?;
    }
    Ok(())
}

/// Performs a complete consistency check of a tree.
///
/// # Panics
/// Panics if any layer does not follow from the one below it, or if the
/// root accessor disagrees with the top layer.
pub fn check_hash_consistency<H: NodeHasher>(tree: &MerkleTree<H>) {
    if let Err(e) = check_layers::<H>(tree.layers()) {
        panic!("{}", e);
    }
    let top = &tree.layers()[tree.depth() - 1];
    hash_equal("Root", &tree.root(), &top[0]);
}
