//! Airdrop Tree commits a list of `(account, amount)` entitlements to a single
//! Merkle root and hands out per-account inclusion proofs that an independent
//! verifier, typically a smart contract, can check bit-exactly.
//!
//! # Overview
//! The crate provides:
//! - [`MerkleTree`]: an immutable binary Merkle tree over 32-byte leaves
//! - [`Proof`] and [`verify`]: stateless proof checking from `(leaf, proof, root)`
//! - [`leaf`]: the canonical record encoding, `abi.encodePacked(uint256, address, uint256)`
//! - [`DistributionBuilder`]: records to a serializable [`Distribution`] artifact
//! - [`ClaimLedger`]: a reference verifier with double-claim protection
//!
//! # Interoperability Contract
//! A verifier reproduces a root from these rules alone:
//!
//! | Rule | Choice |
//! |------|--------|
//! | Hash | Keccak-256 by default, SHA-256 selectable via [`config::HashKind`] |
//! | Leaf | `H(uint256_be(index) ‖ account[20] ‖ uint256_be(amount))` |
//! | Pair | `H(min(a, b) ‖ max(a, b))`, bytewise comparison |
//! | Odd node | promoted unchanged to the next layer |
//! | One leaf | the leaf is the root, the proof is empty |
//! | Zero leaves | rejected with [`MerkleError::EmptyInput`] |
//!
//! These match OpenZeppelin's `MerkleProof.verify`, so a Solidity contract can
//! check proofs produced here without any position bits.
//!
//! # Example
//! ```
//! use airdrop_tree::{leaf, DistributionBuilder, ClaimLedger};
//!
//! let alice = leaf::parse_account("0xb225298d734a0d74911303532a5dffb2b50efe7c").unwrap();
//! let bob = leaf::parse_account("0x838bb0f606fee4de590bb9588e3b6fbdefd356c9").unwrap();
//!
//! let distribution = DistributionBuilder::default()
//!     .build(&[(alice, 100), (bob, 12345)])
//!     .unwrap();
//! assert!(distribution.verify_claim("0xb225298d734a0d74911303532a5dffb2b50efe7c").unwrap());
//!
//! let ledger: ClaimLedger = ClaimLedger::from_distribution(&distribution).unwrap();
//! let claim = distribution.claim("0x838bb0f606fee4de590bb9588e3b6fbdefd356c9").unwrap();
//! ledger.claim(claim.index, &bob, 12345, claim.proof.siblings()).unwrap();
//! assert!(ledger.is_claimed(claim.index));
//! ```
//!
//! # Concurrency
//! Trees and distributions are immutable once built and are `Send + Sync`.
//! Large record sets are hashed on the rayon pool. Claim ledgers keep
//! claimed flags behind per-word locks and accept concurrent claims through `&self`.

pub mod claim;
pub mod config;
pub mod def;
pub mod distribution;
pub mod error;
pub mod leaf;
pub mod merkletree;
pub mod utils;

pub use claim::ClaimLedger;
pub use config::{Config, HashKind};
pub use distribution::{ClaimInfo, Distribution, DistributionBuilder};
pub use error::{ClaimError, DistributionError, HexError, MerkleError};
pub use leaf::{Account, Record};
pub use merkletree::{verify, MerkleTree, Proof};
pub use utils::hasher::{Hash32, Keccak256Hasher, NodeHasher, Sha256Hasher};
