//! Verification of written artifacts
//!
//! Everything here starts from the serialized form: keystores are decrypted
//! and their public key recomputed, deposit records have both roots and the
//! signature recomputed from their own fields. Nothing produced earlier in
//! the same process is trusted.

use std::fmt;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{info, warn};

use crate::bls::{BlsPublicKey, BlsSecretKey, BlsSignature};
use crate::deposit::{signing_root, DepositDataJson, MAX_DEPOSIT_AMOUNT, MIN_DEPOSIT_AMOUNT};
use crate::error::{CryptoError, CryptoResult};
use crate::hash::TreeHash;
use crate::keystore::{Keystore, KeystoreError};

/// Why a single artifact failed verification
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// Keystore could not be read or parsed
    #[error("unreadable keystore: {0}")]
    Unreadable(String),

    /// Checksum mismatch while decrypting
    #[error("wrong password or corrupted ciphertext")]
    WrongPassword,

    /// Any other decryption failure
    #[error("keystore error: {0}")]
    Keystore(String),

    /// Decrypted bytes are not a valid secret key
    #[error("decrypted secret is not a valid BLS secret key")]
    InvalidSecretKey,

    /// Public key from the decrypted secret differs from the stored one
    #[error("public key does not match the decrypted secret")]
    PubkeyMismatch,

    /// Stored root differs from the recomputed one
    #[error("{0} does not match the record fields")]
    RootMismatch(&'static str),

    /// Signature does not verify against the record's pubkey and signing root
    #[error("deposit signature is invalid")]
    InvalidSignature,

    /// Stored public key is not a valid curve point
    #[error("deposit pubkey is not a valid BLS public key")]
    InvalidPubkey,

    /// Amount outside the accepted deposit range
    #[error("deposit amount {0} gwei is out of range")]
    InvalidAmount(u64),

    /// A field could not be decoded
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<KeystoreError> for VerifyError {
    fn from(e: KeystoreError) -> Self {
        match e {
            KeystoreError::InvalidPassword => VerifyError::WrongPassword,
            KeystoreError::Io(e) => VerifyError::Unreadable(e.to_string()),
            KeystoreError::Json(e) => VerifyError::Unreadable(e.to_string()),
            other => VerifyError::Keystore(other.to_string()),
        }
    }
}

/// One failed artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationFailure {
    /// File path or record index
    pub subject: String,
    pub error: VerifyError,
}

impl fmt::Display for VerificationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.error)
    }
}

/// Outcome of verifying a batch of artifacts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Number of artifacts checked
    pub checked: usize,
    /// Failures in input order
    pub failures: Vec<VerificationFailure>,
}

impl VerificationReport {
    /// True only if something was checked and nothing failed
    pub fn is_valid(&self) -> bool {
        self.checked > 0 && self.failures.is_empty()
    }

    /// `Err(VerificationFailed)` unless the report is valid
    pub fn into_result(self) -> CryptoResult<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CryptoError::VerificationFailed(self.failures.len().max(1)))
        }
    }

    pub(crate) fn from_results<I>(results: I) -> Self
    where
        I: IntoIterator<Item = (String, Result<(), VerifyError>)>,
    {
        let mut report = Self::default();
        for (subject, result) in results {
            report.checked += 1;
            if let Err(error) = result {
                warn!(%subject, %error, "Verification failed");
                report.failures.push(VerificationFailure { subject, error });
            }
        }
        report
    }
}

/// Decrypt one keystore and compare the derived public key with the stored one
pub fn verify_keystore(path: &Path, password: &str) -> Result<(), VerifyError> {
    open_keystore(path, password).map(|_| ())
}

/// Load and decrypt a keystore once, returning the secret key after the
/// stored public key has been checked against it
pub(crate) fn open_keystore(path: &Path, password: &str) -> Result<BlsSecretKey, VerifyError> {
    let keystore = Keystore::load(path)?;
    let secret = keystore.decrypt(password)?;
    let secret_key = BlsSecretKey::from_slice(secret.expose_secret())
        .map_err(|_| VerifyError::InvalidSecretKey)?;

    let stored =
        BlsPublicKey::from_hex(keystore.pubkey()).map_err(|_| VerifyError::PubkeyMismatch)?;
    if secret_key.public_key() != stored {
        return Err(VerifyError::PubkeyMismatch);
    }
    Ok(secret_key)
}

/// Verify every keystore file with the same password
///
/// Files are decrypted in parallel; failures are reported per file.
pub fn verify_keystores(paths: &[PathBuf], password: &str) -> VerificationReport {
    info!(count = paths.len(), "Verifying keystores");

    let results: Vec<_> = paths
        .par_iter()
        .map(|path| (path.display().to_string(), verify_keystore(path, password)))
        .collect();

    VerificationReport::from_results(results)
}

/// Check one deposit record: amount, both roots, and the signature
pub fn verify_deposit(record: &DepositDataJson) -> Result<(), VerifyError> {
    let (data, fork_version) = record
        .decode()
        .map_err(|e| VerifyError::Malformed(e.to_string()))?;

    let pubkey = BlsPublicKey::from_bytes(&data.pubkey).map_err(|_| VerifyError::InvalidPubkey)?;

    if !(MIN_DEPOSIT_AMOUNT..=MAX_DEPOSIT_AMOUNT).contains(&data.amount) {
        return Err(VerifyError::InvalidAmount(data.amount));
    }

    let message = data.message();
    let stored_message_root = record
        .message_root()
        .map_err(|e| VerifyError::Malformed(e.to_string()))?;
    if message.tree_hash_root() != stored_message_root {
        return Err(VerifyError::RootMismatch("deposit_message_root"));
    }

    let stored_data_root = record
        .data_root()
        .map_err(|e| VerifyError::Malformed(e.to_string()))?;
    if data.tree_hash_root() != stored_data_root {
        return Err(VerifyError::RootMismatch("deposit_data_root"));
    }

    let signature =
        BlsSignature::from_bytes(&data.signature).map_err(|_| VerifyError::InvalidSignature)?;
    if !pubkey.verify(signing_root(&message, fork_version).as_slice(), &signature) {
        return Err(VerifyError::InvalidSignature);
    }

    Ok(())
}

/// Verify a list of deposit records, reporting failures by record index
pub fn verify_deposit_records(records: &[DepositDataJson]) -> VerificationReport {
    info!(count = records.len(), "Verifying deposit records");

    VerificationReport::from_results(
        records
            .iter()
            .enumerate()
            .map(|(i, record)| (format!("deposit record {i}"), verify_deposit(record))),
    )
}

/// Read a deposit-data file and verify every record in it
pub fn verify_deposit_data_json(path: &Path) -> CryptoResult<VerificationReport> {
    let contents = std::fs::read_to_string(path)?;
    let records: Vec<DepositDataJson> = serde_json::from_str(&contents)?;
    Ok(verify_deposit_records(&records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bls::BlsKeyPair;
    use crate::deposit::{build_message, finalize, sign};
    use crate::keystore::KdfConfig;

    const LIGHT: KdfConfig = KdfConfig::Scrypt { n: 1024, r: 8, p: 1 };

    fn keypair(fill: u8) -> BlsKeyPair {
        let mut bytes = [fill; 32];
        bytes[0] = 0x01;
        BlsKeyPair::from_secret_key(BlsSecretKey::from_bytes(&bytes).unwrap())
    }

    fn record() -> DepositDataJson {
        let signing = keypair(0x0a);
        let withdrawal = keypair(0x0b);
        let message =
            build_message(&signing.public_key, &withdrawal.public_key, MAX_DEPOSIT_AMOUNT)
                .unwrap();
        let fork_version = [0x00, 0x00, 0x20, 0x09];
        let signature = sign(&signing.secret_key, &signing_root(&message, fork_version));
        DepositDataJson::new(&finalize(&message, &signature), fork_version, "pyrmont")
    }

    #[test]
    fn test_valid_record() {
        assert_eq!(verify_deposit(&record()), Ok(()));
    }

    #[test]
    fn test_mutated_amount_fails() {
        let mut r = record();
        r.amount -= 1;
        assert_eq!(
            verify_deposit(&r),
            Err(VerifyError::RootMismatch("deposit_message_root"))
        );
    }

    #[test]
    fn test_mutated_fork_version_fails() {
        let mut r = record();
        r.fork_version = "00000000".into();
        assert_eq!(verify_deposit(&r), Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn test_mutated_withdrawal_credentials_fails() {
        let mut r = record();
        r.withdrawal_credentials = format!("00{}", "ff".repeat(31));
        assert!(verify_deposit(&r).is_err());
    }

    #[test]
    fn test_pubkey_swapped_fails() {
        let mut r = record();
        r.pubkey = keypair(0x0c).public_key.to_hex();
        assert!(verify_deposit(&r).is_err());
    }

    #[test]
    fn test_consistent_roots_with_wrong_signer_fail() {
        // roots recomputed for a different pubkey, signature left alone
        let mut r = record();
        let other = keypair(0x0d);
        let (mut data, fork_version) = r.decode().unwrap();
        data.pubkey = other.public_key.to_bytes().into();
        r = DepositDataJson::new(&data, fork_version, &r.network_name);
        assert_eq!(verify_deposit(&r), Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn test_stale_data_root_fails() {
        let mut r = record();
        r.deposit_data_root = "00".repeat(32);
        assert_eq!(
            verify_deposit(&r),
            Err(VerifyError::RootMismatch("deposit_data_root"))
        );
    }

    #[test]
    fn test_report_names_failed_record() {
        let mut bad = record();
        bad.signature = "zz".into();
        let report = verify_deposit_records(&[record(), bad, record()]);

        assert!(!report.is_valid());
        assert_eq!(report.checked, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].subject, "deposit record 1");
    }

    #[test]
    fn test_empty_report_is_not_valid() {
        assert!(!verify_deposit_records(&[]).is_valid());
    }

    #[test]
    fn test_keystore_checks() {
        let kp = keypair(0x0e);
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("good.json");
        Keystore::encrypt(&kp.secret_key.to_bytes(), "pw", &kp.public_key.to_hex(), "", LIGHT)
            .unwrap()
            .save(&good)
            .unwrap();

        let mislabeled = dir.path().join("mislabeled.json");
        Keystore::encrypt(
            &kp.secret_key.to_bytes(),
            "pw",
            &keypair(0x0f).public_key.to_hex(),
            "",
            LIGHT,
        )
        .unwrap()
        .save(&mislabeled)
        .unwrap();

        assert_eq!(verify_keystore(&good, "pw"), Ok(()));
        assert_eq!(verify_keystore(&good, "nope"), Err(VerifyError::WrongPassword));
        assert_eq!(
            verify_keystore(&mislabeled, "pw"),
            Err(VerifyError::PubkeyMismatch)
        );
        assert!(matches!(
            verify_keystore(&dir.path().join("missing.json"), "pw"),
            Err(VerifyError::Unreadable(_))
        ));

        let report = verify_keystores(&[good, mislabeled], "pw");
        assert_eq!(report.checked, 2);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].subject.ends_with("mislabeled.json"));
    }
}
