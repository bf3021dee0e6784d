use crate::utils::hasher::Hash32;

/// Errors raised while building or querying a [`crate::MerkleTree`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MerkleError {
    #[error("MerkleError: cannot build a tree from zero leaves")]
    EmptyInput,

    #[error("MerkleError: leaf 0x{} is not in the tree", hex::encode(.leaf))]
    LeafNotFound { leaf: Hash32 },

    #[error("MerkleError: leaf at position {position} has {len} bytes, expected 32")]
    MalformedLeaf { position: usize, len: usize },

    #[error("MerkleError: leaf at position {position} is not valid hex: {source}")]
    MalformedHex { position: usize, source: HexError },

    #[error("MerkleError: leaf index {index} out of range for {len} leaves")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HexError {
    #[error("HexError: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("HexError: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("HexError: invalid quantity {0:?}")]
    InvalidQuantity(String),
}

/// Errors raised while turning records into a [`crate::Distribution`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    #[error("DistributionError: account {account} appears more than once")]
    DuplicateAccount { account: String },

    #[error("DistributionError: index {index} appears more than once")]
    DuplicateIndex { index: u64 },

    #[error("DistributionError: no claim for account {account}")]
    UnknownAccount { account: String },

    #[error("DistributionError: token total overflows u128")]
    AmountOverflow,

    #[error("DistributionError: {0}")]
    Merkle(#[from] MerkleError),

    #[error("DistributionError: {0}")]
    Hex(#[from] HexError),
}

/// Errors raised by [`crate::ClaimLedger`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("ClaimError: drop {index} already claimed")]
    AlreadyClaimed { index: u64 },

    #[error("ClaimError: invalid proof for drop {index}")]
    InvalidProof { index: u64 },

    #[error("ClaimError: ledger uses {expected}, distribution uses {found}")]
    HashMismatch { expected: &'static str, found: String },

    #[error("ClaimError: {0}")]
    Hex(#[from] HexError),
}
