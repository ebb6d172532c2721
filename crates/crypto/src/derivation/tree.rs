//! EIP-2333 key tree: master key generation and Lamport-based child derivation
//!
//! Both steps are delegated to blst; this module adds seed validation and
//! keeps every intermediate scalar in zeroizing storage.

use blst::min_pk::SecretKey as BlstSecKey;

use super::{DerivationError, DerivationResult};
use crate::secure::SecretArray;

/// A derived BLS secret scalar, 32 bytes big-endian. Zeroized on drop.
pub type DerivedKey = SecretArray<32>;

/// Attempt bound reported when HKDF_mod_r cannot produce a non-zero scalar
///
/// Each attempt yields zero with probability about 2^-255.
pub const MAX_KEYGEN_ATTEMPTS: usize = 255;

/// Minimum seed length accepted by `derive_master_sk`
pub const MIN_SEED_LENGTH: usize = 32;

fn into_derived(sk: &BlstSecKey) -> DerivedKey {
    let mut bytes = sk.to_bytes();
    SecretArray::take(&mut bytes)
}

/// Derive the root of the key tree from a seed (at least 32 bytes)
pub fn derive_master_sk(seed: &[u8]) -> DerivationResult<DerivedKey> {
    if seed.len() < MIN_SEED_LENGTH {
        return Err(DerivationError::SeedTooShort {
            min: MIN_SEED_LENGTH,
            actual: seed.len(),
        });
    }

    let master = BlstSecKey::derive_master_eip2333(seed)
        .map_err(|_| DerivationError::DerivationExhausted(MAX_KEYGEN_ATTEMPTS))?;
    Ok(into_derived(&master))
}

/// Derive the hardened child at `index` from a parent secret key
pub fn derive_child_sk(parent: &DerivedKey, index: u32) -> DerivationResult<DerivedKey> {
    let parent = BlstSecKey::from_bytes(parent.expose_secret())
        .map_err(|_| DerivationError::InvalidKey)?;
    Ok(into_derived(&parent.derive_child_eip2333(index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-2333 test case 0
    const SEED_0: &str = "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04";
    const MASTER_SK_0: &str = "0d7359d57963ab8fbbde1852dcf553fedbc31f464d80ee7d40ae683122b45070";
    const CHILD_SK_0: &str = "2d18bd6c14e6d15bf8b5085c9b74f3daae3b03cc2014770a599d8c1539e50f8e";

    /// BLS12-381 subgroup order r, big-endian
    const CURVE_ORDER: [u8; 32] = [
        0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8,
        0x05, 0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00,
        0x00, 0x01,
    ];

    #[test]
    fn test_master_sk_vector() {
        let seed = hex::decode(SEED_0).unwrap();
        let master = derive_master_sk(&seed).unwrap();
        assert_eq!(hex::encode(master.expose_secret()), MASTER_SK_0);
    }

    #[test]
    fn test_child_sk_vector() {
        let seed = hex::decode(SEED_0).unwrap();
        let master = derive_master_sk(&seed).unwrap();
        let child = derive_child_sk(&master, 0).unwrap();
        assert_eq!(hex::encode(child.expose_secret()), CHILD_SK_0);
    }

    #[test]
    fn test_master_sk_matches_blst_keygen() {
        for fill in [0x01u8, 0x5a, 0xff] {
            let seed = [fill; 64];
            let ours = derive_master_sk(&seed).unwrap();
            let theirs = BlstSecKey::key_gen(&seed, &[]).unwrap();
            assert_eq!(ours.expose_secret(), &theirs.to_bytes());
        }
    }

    #[test]
    fn test_short_seed_rejected() {
        assert_eq!(
            derive_master_sk(&[0u8; 31]).unwrap_err(),
            DerivationError::SeedTooShort {
                min: 32,
                actual: 31
            }
        );
    }

    #[test]
    fn test_zero_parent_rejected() {
        let parent = DerivedKey::new([0u8; 32]);
        assert_eq!(
            derive_child_sk(&parent, 0).unwrap_err(),
            DerivationError::InvalidKey
        );
    }

    #[test]
    fn test_child_index_is_significant() {
        let master = derive_master_sk(&[7u8; 32]).unwrap();
        let a = derive_child_sk(&master, 0).unwrap();
        let b = derive_child_sk(&master, 1).unwrap();
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn test_derived_key_below_curve_order() {
        let master = derive_master_sk(&[0xffu8; 64]).unwrap();
        assert!(*master.expose_secret() < CURVE_ORDER);
        assert!(crate::bls::BlsSecretKey::from_bytes(master.expose_secret()).is_ok());
    }
}
