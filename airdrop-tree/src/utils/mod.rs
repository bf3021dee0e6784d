//! Utility types and functions.
//!
//! - Hashing functions and the sorted-pair rule ([`hasher`])
//! - Hex transport of fixed-size values ([`hexfmt`])
//! - Lock-free claimed-flag tracking ([`bitmap`])

pub mod bitmap;
pub mod hasher;
pub mod hexfmt;

#[cfg(test)]
mod tests {
    use super::hasher::*;

    /// Known-answer vectors for both hash functions.
    #[test]
    fn test_hash() {
        assert_eq!(
            hex::encode(keccak256("")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        assert_eq!(
            hex::encode(keccak256("abc")),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
        assert_eq!(
            hex::encode(sha256("abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    /// Tests the hash2 and hash2x functions.
    #[test]
    fn test_hash2() {
        assert_eq!(
            hex::encode(Keccak256Hasher::hash2("hello", "world")),
            "fa26db7ca85ead399216e7c6316bc50ed24393c3122b582735e7f3b0f91b93f0"
        );
        assert_eq!(
            hex::encode(Keccak256Hasher::hash2x("world", "hello", true)),
            "fa26db7ca85ead399216e7c6316bc50ed24393c3122b582735e7f3b0f91b93f0"
        );
        assert_eq!(
            hex::encode(Sha256Hasher::hash2("hello", "world")),
            "936a185caaa266bb9cbe981e9e05cb78cd732b0b3280eb944412bb6f8f8f07af"
        );
    }

    /// The pair rule is symmetric and orders by byte value.
    #[test]
    fn test_hash_pair() {
        let a = keccak256("a");
        let b = keccak256("b");
        assert_eq!(
            Keccak256Hasher::hash_pair(&a, &b),
            Keccak256Hasher::hash_pair(&b, &a)
        );
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        assert_eq!(
            Keccak256Hasher::hash_pair(&a, &b),
            Keccak256Hasher::hash2(lo, hi)
        );
        assert_ne!(
            Keccak256Hasher::hash_pair(&a, &b),
            Sha256Hasher::hash_pair(&a, &b)
        );
    }
}
