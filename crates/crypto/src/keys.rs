//! Per-validator key pairs
//!
//! Each validator owns two BLS12-381 keys reached from the same branch:
//! - Withdrawal key (`m/12381/3600/i/0`): controls future withdrawals, only its
//!   public key leaves this process, as withdrawal credentials
//! - Signing key (`m/12381/3600/i/0/0`): signs deposits and validator duties,
//!   exported encrypted in a keystore

use crate::bls::{BlsKeyPair, BlsPublicKey, BlsSecretKey};
use crate::derivation::{signing_path, withdrawal_path};

/// Key set for one validator index
///
/// Secret keys zeroize on drop.
#[derive(Clone)]
pub struct ValidatorKeys {
    /// Validator index in the key tree
    pub index: u32,
    /// Signing key pair
    pub signing: BlsKeyPair,
    /// Withdrawal key pair
    pub withdrawal: BlsKeyPair,
}

impl ValidatorKeys {
    /// Get the signing public key
    pub fn signing_pubkey(&self) -> &BlsPublicKey {
        &self.signing.public_key
    }

    /// Get the withdrawal public key
    pub fn withdrawal_pubkey(&self) -> &BlsPublicKey {
        &self.withdrawal.public_key
    }

    /// Get the signing secret key
    pub fn signing_secret(&self) -> &BlsSecretKey {
        &self.signing.secret_key
    }

    /// Derivation path of the signing key
    pub fn signing_path(&self) -> String {
        signing_path(self.index)
    }

    /// Derivation path of the withdrawal key
    pub fn withdrawal_path(&self) -> String {
        withdrawal_path(self.index)
    }
}

impl std::fmt::Debug for ValidatorKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorKeys")
            .field("index", &self.index)
            .field("signing", &self.signing.public_key)
            .field("withdrawal", &self.withdrawal.public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::derivation::validator_keys;

    #[test]
    fn test_paths_follow_index() {
        let keys = validator_keys(&[9u8; 32], 7).unwrap();
        assert_eq!(keys.signing_path(), "m/12381/3600/7/0/0");
        assert_eq!(keys.withdrawal_path(), "m/12381/3600/7/0");
    }

    #[test]
    fn test_signing_secret_matches_pubkey() {
        let keys = validator_keys(&[9u8; 32], 0).unwrap();
        assert_eq!(&keys.signing_secret().public_key(), keys.signing_pubkey());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let keys = validator_keys(&[9u8; 32], 0).unwrap();
        let debug = format!("{:?}", keys);
        assert!(debug.contains("ValidatorKeys"));
        assert!(!debug.contains("secret_key"));
    }
}
