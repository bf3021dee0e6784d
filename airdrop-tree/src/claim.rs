//! A reference claim verifier.
//!
//! [`ClaimLedger`] plays the role of the distributor contract, minus token
//! transfer and persistence: it holds the published root and a claimed-flag per
//! index. A claim is accepted once, and only with a proof that links the
//! re-derived leaf `H(encodePacked(index, account, amount))` to the root.
//!
//! Claims take `&self`; the claimed flags sit behind per-word locks, so a
//! ledger can be shared between threads and two racing claims of one index
//! never both succeed. Indices may be any `u64`: flags are stored sparsely,
//! one 128-bit word per `index / 128`, as the contract stores them.

use std::marker::PhantomData;

use log::debug;

use crate::def::CLAIM_WORD_BITS;
use crate::distribution::Distribution;
use crate::error::ClaimError;
use crate::leaf::{self, Account};
use crate::merkletree::proof;
use crate::utils::bitmap::Bitmap;
use crate::utils::hasher::{Hash32, Keccak256Hasher, NodeHasher};
use crate::utils::hexfmt;

pub struct ClaimLedger<H: NodeHasher = Keccak256Hasher> {
    root: Hash32,
    claimed: Bitmap,
    _hasher: PhantomData<fn() -> H>,
}

impl<H: NodeHasher> ClaimLedger<H> {
    /// Creates an empty ledger under `root`.
    pub fn new(root: Hash32) -> Self {
        Self {
            root,
            claimed: Bitmap::new(),
            _hasher: PhantomData,
        }
    }

    /// Creates an empty ledger under the root of `distribution`.
    ///
    /// # Errors
    /// * [`ClaimError::HashMismatch`] if the distribution was built with a
    ///   different hash function than `H`
    /// * [`ClaimError::Hex`] if the root is malformed
    pub fn from_distribution(distribution: &Distribution) -> Result<Self, ClaimError> {
        let found = distribution.hash_function.to_string();
        if found != H::NAME {
            return Err(ClaimError::HashMismatch {
                expected: H::NAME,
                found,
            });
        }
        Ok(Self::new(distribution.root()?))
    }

    pub fn root(&self) -> Hash32 {
        self.root
    }

    pub fn is_claimed(&self, index: u64) -> bool {
        self.claimed.is_set(index)
    }

    /// Claims drop `index` for `account`.
    ///
    /// # Errors
    /// * [`ClaimError::AlreadyClaimed`] if `index` was claimed before
    /// * [`ClaimError::InvalidProof`] if the proof does not reach the root
    pub fn claim(
        &self,
        index: u64,
        account: &Account,
        amount: u128,
        proof: &[Hash32],
    ) -> Result<(), ClaimError> {
        if self.is_claimed(index) {
            return Err(ClaimError::AlreadyClaimed { index });
        }

        let leaf = leaf::leaf_hash::<H>(index, account, amount);
        if !proof::verify::<H>(&leaf, proof, &self.root) {
            return Err(ClaimError::InvalidProof { index });
        }

        // lost a race against another valid claim of the same index
        if !self.claimed.try_set(index) {
            return Err(ClaimError::AlreadyClaimed { index });
        }
        debug!(
            "claimed drop {} for {} amount {}",
            index,
            leaf::format_account(account),
            amount
        );
        Ok(())
    }

    /// Like [`ClaimLedger::claim`], with account and proof as hex strings.
    pub fn claim_hex<S: AsRef<str>>(
        &self,
        index: u64,
        account: &str,
        amount: u128,
        proof: &[S],
    ) -> Result<(), ClaimError> {
        let account = leaf::parse_account(account)?;
        let proof = hexfmt::decode_hashes(proof)?;
        self.claim(index, &account, amount, &proof)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.count_set()
    }

    /// Returns the 128-bit claimed word holding `index`, as stored on chain.
    pub fn claimed_word(&self, index: u64) -> u128 {
        self.claimed.word(index / CLAIM_WORD_BITS)
    }
}

impl<H: NodeHasher> std::fmt::Debug for ClaimLedger<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimLedger")
            .field("hash", &H::NAME)
            .field("root", &hexfmt::encode_0x(self.root))
            .field("claimed", &self.claimed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, HashKind};
    use crate::distribution::DistributionBuilder;
    use crate::leaf::Record;
    use crate::utils::hasher::Sha256Hasher;

    fn accounts(n: u8) -> Vec<(Account, u128)> {
        (1..=n)
            .map(|i| {
                let mut a = [0x11u8; 20];
                a[19] = i;
                (a, i as u128 * 10)
            })
            .collect()
    }

    fn setup(n: u8) -> (Distribution, ClaimLedger) {
        let d = DistributionBuilder::default().build(&accounts(n)).unwrap();
        let ledger = ClaimLedger::<Keccak256Hasher>::from_distribution(&d).unwrap();
        (d, ledger)
    }

    #[test]
    fn test_claim_once() {
        let (d, ledger) = setup(5);
        for (account, info) in &d.claims {
            let amount = hexfmt::decode_quantity(&info.amount).unwrap();
            ledger
                .claim_hex(info.index, account, amount, &info.proof.to_hex())
                .unwrap();
            assert!(ledger.is_claimed(info.index));
            assert_eq!(
                ledger
                    .claim_hex(info.index, account, amount, &info.proof.to_hex())
                    .unwrap_err(),
                ClaimError::AlreadyClaimed { index: info.index }
            );
        }
        assert_eq!(ledger.claimed_count(), 5);
        assert_eq!(ledger.claimed_word(0), 0b11111);
    }

    #[test]
    fn test_invalid_proof_leaves_unclaimed() {
        let (d, ledger) = setup(4);
        let (account, info) = d.claims.iter().next().unwrap();
        let amount = hexfmt::decode_quantity(&info.amount).unwrap();
        let err = ledger
            .claim_hex(info.index, account, amount + 1, &info.proof.to_hex())
            .unwrap_err();
        assert_eq!(err, ClaimError::InvalidProof { index: info.index });
        assert!(!ledger.is_claimed(info.index));

        // right proof, wrong index
        let other = (info.index + 1) % 4;
        let err = ledger
            .claim_hex(other, account, amount, &info.proof.to_hex())
            .unwrap_err();
        assert_eq!(err, ClaimError::InvalidProof { index: other });
    }

    #[test]
    fn test_sparse_caller_indices() {
        let entries = accounts(3);
        let records = [
            Record::new(u64::MAX, entries[0].0, entries[0].1),
            Record::new(1 << 40, entries[1].0, entries[1].1),
            Record::new(0, entries[2].0, entries[2].1),
        ];
        let d = DistributionBuilder::default().build_records(&records).unwrap();
        let ledger = ClaimLedger::<Keccak256Hasher>::from_distribution(&d).unwrap();

        for record in &records {
            let info = d.claim(&leaf::format_account(&record.account)).unwrap();
            assert_eq!(info.index, record.index);
            ledger
                .claim(record.index, &record.account, record.amount, info.proof.siblings())
                .unwrap();
            assert!(ledger.is_claimed(record.index));
        }
        assert_eq!(ledger.claimed_count(), 3);
        assert_eq!(ledger.claimed_word(u64::MAX), 1u128 << 127);
        assert_eq!(ledger.claimed_word(1 << 40), 1);
        assert!(!ledger.is_claimed(u64::MAX - 1));
        assert!(!ledger.is_claimed(1));
    }

    #[test]
    fn test_hash_mismatch() {
        let d = DistributionBuilder::new(Config::from_hash(HashKind::Sha256))
            .build(&accounts(2))
            .unwrap();
        assert!(matches!(
            ClaimLedger::<Keccak256Hasher>::from_distribution(&d),
            Err(ClaimError::HashMismatch { .. })
        ));
        let ledger = ClaimLedger::<Sha256Hasher>::from_distribution(&d).unwrap();
        let (account, info) = d.claims.iter().next().unwrap();
        let amount = hexfmt::decode_quantity(&info.amount).unwrap();
        ledger
            .claim_hex(info.index, account, amount, &info.proof.to_hex())
            .unwrap();
    }

    #[test]
    fn test_concurrent_claims_single_winner() {
        let (d, ledger) = setup(6);
        let (account, info) = d.claims.iter().next().unwrap();
        let account = leaf::parse_account(account).unwrap();
        let amount = hexfmt::decode_quantity(&info.amount).unwrap();
        let proof = info.proof.siblings().to_vec();

        let wins: usize = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        ledger
                            .claim(info.index, &account, amount, &proof)
                            .is_ok() as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });
        assert_eq!(wins, 1);
        assert_eq!(ledger.claimed_count(), 1);
    }
}
