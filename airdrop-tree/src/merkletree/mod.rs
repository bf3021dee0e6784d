//! Merkle tree construction, proofs and verification.
//!
//! - [`MerkleTree`]: immutable tree built from ordered 32-byte leaves
//! - [`proof`]: the [`Proof`] type and the stateless [`proof::verify`]
//! - [`check`]: layer-by-layer consistency checks
//!
//! Pair rule: sorted concatenation. Odd rule: the last unpaired node is
//! promoted unchanged.

pub mod check;
pub mod proof;
pub mod tree;

pub use proof::{verify, Proof};
pub use tree::MerkleTree;
