//! EIP-2334 path convention for validator keys

use tracing::debug;

use super::tree::{derive_child_sk, derive_master_sk, DerivedKey};
use super::{DerivationError, DerivationResult};
use crate::bls::{BlsKeyPair, BlsSecretKey};
use crate::keys::ValidatorKeys;

/// BLS12-381 purpose level
pub const PURPOSE: u32 = 12381;

/// Coin type registered for the beacon chain
pub const COIN_TYPE: u32 = 3600;

/// Withdrawal key path for a validator index: `m/12381/3600/{index}/0`
pub fn withdrawal_path(index: u32) -> String {
    format!("m/{PURPOSE}/{COIN_TYPE}/{index}/0")
}

/// Signing key path for a validator index: `m/12381/3600/{index}/0/0`
pub fn signing_path(index: u32) -> String {
    format!("m/{PURPOSE}/{COIN_TYPE}/{index}/0/0")
}

/// Parse a path of the form `m/a/b/c`
///
/// Every EIP-2333 derivation is hardened, so no hardening marker is accepted.
pub fn parse_path(path: &str) -> DerivationResult<Vec<u32>> {
    let mut parts = path.trim().split('/');

    if parts.next() != Some("m") {
        return Err(DerivationError::InvalidPath(format!(
            "{path}: path must start with 'm'"
        )));
    }

    let components = parts
        .map(|part| {
            part.parse::<u32>().map_err(|_| {
                DerivationError::InvalidPath(format!("{path}: invalid path component '{part}'"))
            })
        })
        .collect::<DerivationResult<Vec<_>>>()?;

    if components.is_empty() {
        return Err(DerivationError::InvalidPath(format!(
            "{path}: path has no components"
        )));
    }

    Ok(components)
}

/// Derive the secret key at `path` from a seed
pub fn derive_sk_from_path(seed: &[u8], path: &str) -> DerivationResult<DerivedKey> {
    let components = parse_path(path)?;
    let mut key = derive_master_sk(seed)?;
    for index in components {
        key = derive_child_sk(&key, index)?;
    }
    Ok(key)
}

/// Derive the withdrawal and signing key pairs for one validator
///
/// Only reads `seed`; calls for different indices are independent.
pub fn validator_keys(seed: &[u8], index: u32) -> DerivationResult<ValidatorKeys> {
    let mut key = derive_master_sk(seed)?;
    for component in [PURPOSE, COIN_TYPE, index, 0] {
        key = derive_child_sk(&key, component)?;
    }
    let withdrawal = to_keypair(&key)?;

    let signing_key = derive_child_sk(&key, 0)?;
    let signing = to_keypair(&signing_key)?;

    debug!(
        index,
        pubkey = %signing.public_key.to_hex(),
        "Derived validator keys"
    );

    Ok(ValidatorKeys {
        index,
        signing,
        withdrawal,
    })
}

fn to_keypair(key: &DerivedKey) -> DerivationResult<BlsKeyPair> {
    let secret =
        BlsSecretKey::from_bytes(key.expose_secret()).map_err(|_| DerivationError::InvalidKey)?;
    Ok(BlsKeyPair::from_secret_key(secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 64] = [0x42; 64];

    #[test]
    fn test_path_strings() {
        assert_eq!(withdrawal_path(5), "m/12381/3600/5/0");
        assert_eq!(signing_path(5), "m/12381/3600/5/0/0");
    }

    #[test]
    fn test_parse_valid_path() {
        assert_eq!(
            parse_path("m/12381/3600/0/0/0").unwrap(),
            vec![12381, 3600, 0, 0, 0]
        );
    }

    #[test]
    fn test_parse_invalid_paths() {
        assert!(parse_path("12381/3600").is_err());
        assert!(parse_path("m").is_err());
        assert!(parse_path("m/12381/x").is_err());
        assert!(parse_path("m/12381'/3600").is_err());
        assert!(parse_path("m//1").is_err());
    }

    #[test]
    fn test_validator_keys_match_paths() {
        let keys = validator_keys(&SEED, 3).unwrap();

        let signing = derive_sk_from_path(&SEED, &signing_path(3)).unwrap();
        let withdrawal = derive_sk_from_path(&SEED, &withdrawal_path(3)).unwrap();

        assert_eq!(&keys.signing.secret_key.to_bytes(), signing.expose_secret());
        assert_eq!(
            &keys.withdrawal.secret_key.to_bytes(),
            withdrawal.expose_secret()
        );
        assert_eq!(keys.index, 3);
    }

    #[test]
    fn test_validator_keys_deterministic() {
        let a = validator_keys(&SEED, 0).unwrap();
        let b = validator_keys(&SEED, 0).unwrap();
        assert_eq!(a.signing.public_key, b.signing.public_key);
        assert_eq!(a.withdrawal.public_key, b.withdrawal.public_key);
    }

    #[test]
    fn test_signing_and_withdrawal_differ() {
        let keys = validator_keys(&SEED, 0).unwrap();
        assert_ne!(keys.signing.public_key, keys.withdrawal.public_key);
    }
}
