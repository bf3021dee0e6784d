//! Turning entitlement records into a publishable distribution.
//!
//! [`DistributionBuilder`] hashes every record with the canonical leaf
//! encoding ([`crate::leaf`]), builds the tree and collects one proof per
//! account. The result, [`Distribution`], is plain serde data:
//!
//! ```json
//! {
//!   "merkleRoot": "0x44cd…",
//!   "tokenTotal": "0x30a8",
//!   "hashFunction": "keccak256",
//!   "claims": {
//!     "0xb225…": { "index": 0, "amount": "0x64", "proof": ["0x6fed…", "0xde87…"] }
//!   }
//! }
//! ```
//!
//! Reading records from files and writing the artifact out are left to the
//! caller.

use std::collections::{BTreeMap, HashSet};

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{Config, HashKind};
use crate::error::{DistributionError, HexError};
use crate::leaf::{self, Account, Record};
use crate::merkletree::{MerkleTree, Proof};
use crate::utils::hasher::{Hash32, Keccak256Hasher, NodeHasher, Sha256Hasher};
use crate::utils::hexfmt;

/// One account's entry in a [`Distribution`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimInfo {
    pub index: u64,
    /// Amount as `0x`-prefixed hex quantity
    pub amount: String,
    pub proof: Proof,
}

/// The exported artifact: root, total and per-account proofs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub merkle_root: String,
    pub token_total: String,
    pub hash_function: HashKind,
    /// Keyed by lowercase `0x`-prefixed account. Keys read from JSON may use
    /// any case and are normalized on load.
    #[serde(deserialize_with = "deserialize_claims")]
    pub claims: BTreeMap<String, ClaimInfo>,
}

fn deserialize_claims<'de, D>(deserializer: D) -> Result<BTreeMap<String, ClaimInfo>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, ClaimInfo>::deserialize(deserializer)?;
    let mut claims = BTreeMap::new();
    for (key, info) in raw {
        let account = leaf::parse_account(&key).map_err(serde::de::Error::custom)?;
        let account = leaf::format_account(&account);
        if claims.contains_key(&account) {
            return Err(serde::de::Error::custom(format!(
                "account {} appears more than once",
                account
            )));
        }
        claims.insert(account, info);
    }
    Ok(claims)
}

impl Distribution {
    pub fn root(&self) -> Result<Hash32, HexError> {
        hexfmt::decode_hash(&self.merkle_root)
    }

    pub fn token_total(&self) -> Result<u128, HexError> {
        hexfmt::decode_quantity(&self.token_total)
    }

    /// Looks up a claim; the account may use any hex case and may omit `0x`.
    pub fn claim(&self, account: &str) -> Option<&ClaimInfo> {
        let account = leaf::parse_account(account).ok()?;
        self.claims.get(&leaf::format_account(&account))
    }

    /// Re-derives an account's leaf and checks its proof against the root.
    ///
    /// This is what a claims UI or contract does independently; it only reads
    /// the artifact.
    pub fn verify_claim(&self, account: &str) -> Result<bool, DistributionError> {
        let parsed = leaf::parse_account(account)?;
        let claim = self
            .claims
            .get(&leaf::format_account(&parsed))
            .ok_or_else(|| DistributionError::UnknownAccount {
                account: account.to_string(),
            })?;
        let amount = hexfmt::decode_quantity(&claim.amount)?;
        let root = self.root()?;
        let ok = match self.hash_function {
            HashKind::Keccak256 => {
                let leaf = leaf::leaf_hash::<Keccak256Hasher>(claim.index, &parsed, amount);
                claim.proof.verify::<Keccak256Hasher>(&leaf, &root)
            }
            HashKind::Sha256 => {
                let leaf = leaf::leaf_hash::<Sha256Hasher>(claim.index, &parsed, amount);
                claim.proof.verify::<Sha256Hasher>(&leaf, &root)
            }
        };
        Ok(ok)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Builds [`Distribution`]s under a fixed [`Config`].
#[derive(Clone, Debug, Default)]
pub struct DistributionBuilder {
    config: Config,
}

impl DistributionBuilder {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds a distribution from `(account, amount)` pairs, indexing them by
    /// position.
    pub fn build(&self, entries: &[(Account, u128)]) -> Result<Distribution, DistributionError> {
        let records: Vec<Record> = entries
            .iter()
            .enumerate()
            .map(|(i, (account, amount))| Record::new(i as u64, *account, *amount))
            .collect();
        self.build_records(&records)
    }

    /// Builds a distribution from records carrying their own indices.
    ///
    /// # Errors
    /// * [`DistributionError::DuplicateAccount`] if an account repeats
    /// * [`DistributionError::DuplicateIndex`] if an index repeats
    /// * [`DistributionError::AmountOverflow`] if the total exceeds `u128`
    /// * [`DistributionError::Merkle`] if `records` is empty
    pub fn build_records(&self, records: &[Record]) -> Result<Distribution, DistributionError> {
        match self.config.hash {
            HashKind::Keccak256 => self.build_with::<Keccak256Hasher>(records),
            HashKind::Sha256 => self.build_with::<Sha256Hasher>(records),
        }
    }

    /// Builds only the tree for `records`, under this builder's leaf order.
    pub fn tree<H: NodeHasher>(
        &self,
        records: &[Record],
    ) -> Result<MerkleTree<H>, DistributionError> {
        validate(records)?;
        let (tree, _) = self.build_tree::<H>(records)?;
        Ok(tree)
    }

    fn build_with<H: NodeHasher>(
        &self,
        records: &[Record],
    ) -> Result<Distribution, DistributionError> {
        let total = validate(records)?;
        let (tree, sorted_from) = self.build_tree::<H>(records)?;

        let mut claims = BTreeMap::new();
        for (i, record) in records.iter().enumerate() {
            // leaves are distinct: every record has its own index
            let proof = match &sorted_from {
                Some(leaves) => tree.proof(&leaves[i])?,
                None => tree.proof_at(i)?,
            };
            claims.insert(
                leaf::format_account(&record.account),
                ClaimInfo {
                    index: record.index,
                    amount: hexfmt::encode_quantity(record.amount),
                    proof,
                },
            );
        }

        let distribution = Distribution {
            merkle_root: tree.root_hex(),
            token_total: hexfmt::encode_quantity(total),
            hash_function: self.config.hash,
            claims,
        };
        info!(
            "merkle root: {} claims={} total={}",
            distribution.merkle_root,
            distribution.claims.len(),
            total
        );
        Ok(distribution)
    }

    /// Hashes every record once and builds the tree.
    ///
    /// # Returns
    /// The tree, plus the leaves in record order when `sort_leaves` moved
    /// them. Without sorting, record `i` is leaf `i`.
    fn build_tree<H: NodeHasher>(
        &self,
        records: &[Record],
    ) -> Result<(MerkleTree<H>, Option<Vec<Hash32>>), DistributionError> {
        let leaves = self.leaves::<H>(records);
        if !self.config.sort_leaves {
            return Ok((MerkleTree::from_leaves(leaves)?, None));
        }
        let mut sorted = leaves.clone();
        sorted.sort_unstable();
        Ok((MerkleTree::from_leaves(sorted)?, Some(leaves)))
    }

    fn leaves<H: NodeHasher>(&self, records: &[Record]) -> Vec<Hash32> {
        if records.len() >= self.config.parallel_threshold {
            debug!("hashing {} leaves on rayon pool", records.len());
            records.par_iter().map(|r| r.leaf::<H>()).collect()
        } else {
            records.iter().map(|r| r.leaf::<H>()).collect()
        }
    }
}

/// Rejects repeated accounts and indices, returns the token total.
fn validate(records: &[Record]) -> Result<u128, DistributionError> {
    let mut accounts = HashSet::with_capacity(records.len());
    let mut indices = HashSet::with_capacity(records.len());
    let mut total: u128 = 0;
    for record in records {
        if !accounts.insert(record.account) {
            return Err(DistributionError::DuplicateAccount {
                account: leaf::format_account(&record.account),
            });
        }
        if !indices.insert(record.index) {
            return Err(DistributionError::DuplicateIndex {
                index: record.index,
            });
        }
        total = total
            .checked_add(record.amount)
            .ok_or(DistributionError::AmountOverflow)?;
    }
    Ok(total)
}
