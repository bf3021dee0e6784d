//! Configuration for building airdrop distributions.
//!
//! All choices that affect the published root are explicit here; nothing is
//! read from the environment or the working directory.
//!
//! ## Hash function
//! - `hash`: [`HashKind::Keccak256`] (default) for EVM verifiers, or
//!   [`HashKind::Sha256`] for verifiers without a Keccak primitive.
//!   The same function hashes leaves and internal nodes.
//!
//! ## Leaf order
//! - `sort_leaves`: when set, leaf hashes are sorted ascending before the tree
//!   is built. Proofs then no longer depend on record order; the record index
//!   still lives inside each leaf.
//!
//! ## Parallelism
//! - `parallel_threshold`: record count at which leaf hashing moves onto the
//!   rayon pool. Smaller inputs are hashed on the calling thread.
//!
//! # Usage Examples
//! ```
//! use airdrop_tree::config::{Config, HashKind};
//!
//! let config = Config::default();
//! assert_eq!(config.hash, HashKind::Keccak256);
//!
//! let mut config = Config::from_hash("sha256".parse().unwrap());
//! config.set_sort_leaves(true);
//! assert!(config.sort_leaves);
//! ```

use serde::{Deserialize, Serialize};

use crate::def::PARALLEL_HASH_THRESHOLD;

/// Hash function used for leaves and nodes.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HashKind {
    #[default]
    Keccak256,
    Sha256,
}

/// Settings for [`crate::DistributionBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hash function for leaves and nodes
    pub hash: HashKind,
    /// Whether to sort leaf hashes before building the tree
    pub sort_leaves: bool,
    /// Record count at or above which leaves are hashed in parallel
    pub parallel_threshold: usize,
}

impl Default for Config {
    /// # Default Values
    /// - `hash`: Keccak-256
    /// - `sort_leaves`: false
    /// - `parallel_threshold`: 4096
    fn default() -> Self {
        Self {
            hash: HashKind::Keccak256,
            sort_leaves: false,
            parallel_threshold: PARALLEL_HASH_THRESHOLD,
        }
    }
}

impl Config {
    pub fn new(hash: HashKind, sort_leaves: bool, parallel_threshold: usize) -> Self {
        Self {
            hash,
            sort_leaves,
            parallel_threshold,
        }
    }

    /// Creates a Config with default values except for the hash function.
    pub fn from_hash(hash: HashKind) -> Self {
        Config {
            hash,
            ..Config::default()
        }
    }

    pub fn set_sort_leaves(&mut self, sort_leaves: bool) {
        self.sort_leaves = sort_leaves;
    }

    /// Sets the parallel hashing threshold; `usize::MAX` keeps hashing on the
    /// calling thread.
    pub fn set_parallel_threshold(&mut self, parallel_threshold: usize) {
        self.parallel_threshold = parallel_threshold;
    }
}
