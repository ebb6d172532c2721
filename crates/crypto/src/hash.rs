//! Hashing utilities.
//!
//! SHA-256 and the SSZ `hash_tree_root` re-exported from `tree_hash`.

use sha2::{Digest, Sha256};

pub use alloy_primitives::{FixedBytes, B256};
pub use tree_hash::TreeHash;

/// A 32-byte hash or SSZ root.
pub type Root = tree_hash::Hash256;

/// SHA-256 of arbitrary data.
pub fn sha256(data: &[u8]) -> Root {
    let digest: [u8; 32] = Sha256::digest(data).into();
    Root::from(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let data = b"test";
        assert_eq!(sha256(data), sha256(data));
    }

    #[test]
    fn test_sha256_known_answer() {
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_short_vector_root_is_right_padded() {
        let mut expected = [0u8; 32];
        expected[..4].copy_from_slice(&[1, 2, 3, 4]);
        assert_eq!([1u8, 2, 3, 4].tree_hash_root(), Root::from(expected));
    }

    #[test]
    fn test_bytes48_root() {
        let mut second = [0u8; 32];
        second[..16].copy_from_slice(&[0xab; 16]);
        let mut pair = [0xabu8; 32].to_vec();
        pair.extend_from_slice(&second);

        assert_eq!(FixedBytes::<48>::repeat_byte(0xab).tree_hash_root(), sha256(&pair));
    }

    #[test]
    fn test_uint64_root_is_little_endian() {
        let root = 32_000_000_000u64.tree_hash_root();
        assert_eq!(&root[..8], &32_000_000_000u64.to_le_bytes());
        assert!(root[8..].iter().all(|b| *b == 0));
    }
}
