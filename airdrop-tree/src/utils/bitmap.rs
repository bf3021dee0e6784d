//! A concurrent, sparse bitmap of claimed flags.
//!
//! # Design
//!
//! Bits are grouped into 128-bit words, the layout the distributor contract
//! stores claimed flags in: bit `i` lives in word `i / 128` at position
//! `i % 128`. Only words with at least one set bit are stored, so any `u64`
//! index is addressable and memory grows with the number of claims, not with
//! the largest index.
//!
//! Words live in a `DashMap`; a set is a read-modify-write under the word's
//! shard lock, so of several threads racing on one bit exactly one wins.
use dashmap::DashMap;

use crate::def::CLAIM_WORD_BITS;

#[derive(Debug, Default)]
pub struct Bitmap {
    /// Map of word indices to non-zero words
    words: DashMap<u64, u128>,
}

impl Bitmap {
    pub fn new() -> Self {
        Self {
            words: DashMap::new(),
        }
    }

    /// Sets bit `index` and reports whether this call was the one that set it.
    pub fn try_set(&self, index: u64) -> bool {
        let (word_index, mask) = locate(index);
        let mut word = self.words.entry(word_index).or_insert(0);
        if *word & mask != 0 {
            return false;
        }
        *word |= mask;
        true
    }

    pub fn is_set(&self, index: u64) -> bool {
        let (word_index, mask) = locate(index);
        self.word(word_index) & mask != 0
    }

    /// Returns word `word_index`; words never written read as zero.
    pub fn word(&self, word_index: u64) -> u128 {
        self.words.get(&word_index).map(|w| *w).unwrap_or(0)
    }

    pub fn count_set(&self) -> usize {
        self.words
            .iter()
            .map(|w| w.value().count_ones() as usize)
            .sum()
    }

    /// Number of words holding at least one set bit.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

fn locate(index: u64) -> (u64, u128) {
    (index / CLAIM_WORD_BITS, 1u128 << (index % CLAIM_WORD_BITS))
}

const _: () = assert!(CLAIM_WORD_BITS == u128::BITS as u64);
