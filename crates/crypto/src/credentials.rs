//! Validator credentials and the batch pipeline
//!
//! A [`CredentialList`] turns one mnemonic into a run of validators:
//! keys derived per index, deposits signed, keystores encrypted and written,
//! deposit data exported, and every artifact verified again from disk.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::bls::BlsPublicKey;
use crate::deposit::{
    build_message, finalize, sign, signing_root, DepositData, DepositDataJson, ForkVersion,
};
use crate::derivation::validator_keys;
use crate::error::{CryptoError, CryptoResult};
use crate::keys::ValidatorKeys;
use crate::keystore::{KdfConfig, Keystore};
use crate::mnemonic::Mnemonic;
use crate::verify::{self, VerificationFailure, VerificationReport, VerifyError};

/// Chain the deposits are signed for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainIdentity {
    pub network_name: String,
    pub fork_version: ForkVersion,
}

/// One validator: its keys, amount and signed deposit
///
/// Immutable once built; the signature is computed during construction.
pub struct Credential {
    keys: ValidatorKeys,
    chain: ChainIdentity,
    deposit: DepositData,
}

impl Credential {
    /// Derive keys for `index` from `seed` and sign its deposit
    pub fn new(seed: &[u8], index: u32, amount: u64, chain: &ChainIdentity) -> CryptoResult<Self> {
        let keys = validator_keys(seed, index)?;

        let message = build_message(keys.signing_pubkey(), keys.withdrawal_pubkey(), amount)?;
        let root = signing_root(&message, chain.fork_version);
        let signature = sign(keys.signing_secret(), &root);
        let deposit = finalize(&message, &signature);

        Ok(Self {
            keys,
            chain: chain.clone(),
            deposit,
        })
    }

    /// Validator index
    pub fn index(&self) -> u32 {
        self.keys.index
    }

    /// Deposit amount in gwei
    pub fn amount(&self) -> u64 {
        self.deposit.amount
    }

    /// Signing public key
    pub fn signing_pubkey(&self) -> &BlsPublicKey {
        self.keys.signing_pubkey()
    }

    /// Withdrawal public key
    pub fn withdrawal_pubkey(&self) -> &BlsPublicKey {
        self.keys.withdrawal_pubkey()
    }

    /// Signing key derivation path
    pub fn signing_path(&self) -> String {
        self.keys.signing_path()
    }

    /// The signed deposit
    pub fn deposit_data(&self) -> &DepositData {
        &self.deposit
    }

    /// JSON record for the deposit-data file
    pub fn deposit_json(&self) -> DepositDataJson {
        DepositDataJson::new(
            &self.deposit,
            self.chain.fork_version,
            &self.chain.network_name,
        )
    }

    /// Encrypt the signing key
    pub fn signing_keystore(&self, password: &str, kdf: KdfConfig) -> CryptoResult<Keystore> {
        let secret = zeroize::Zeroizing::new(self.keys.signing_secret().to_bytes());
        let keystore = Keystore::encrypt(
            secret.as_slice(),
            password,
            &self.signing_pubkey().to_hex(),
            &self.signing_path(),
            kdf,
        )?;
        Ok(keystore)
    }

    /// File name of this validator's keystore
    pub fn keystore_file_name(&self, timestamp: i64) -> String {
        format!(
            "keystore-{}-{}.json",
            self.signing_path().replace('/', "_"),
            timestamp
        )
    }

    /// Encrypt the signing key and write it into `folder`
    pub fn save_signing_keystore(
        &self,
        password: &str,
        folder: &Path,
        kdf: KdfConfig,
        timestamp: i64,
    ) -> CryptoResult<PathBuf> {
        let keystore = self.signing_keystore(password, kdf)?;
        let path = folder.join(self.keystore_file_name(timestamp));
        keystore.save(&path)?;
        debug!(index = self.index(), path = %path.display(), "Saved keystore");
        Ok(path)
    }

    /// Decrypt a written keystore and check it holds this credential's key
    pub fn verify_keystore(&self, path: &Path, password: &str) -> Result<(), VerifyError> {
        let secret_key = verify::open_keystore(path, password)?;
        if secret_key.public_key() != *self.signing_pubkey() {
            return Err(VerifyError::PubkeyMismatch);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("keys", &self.keys)
            .field("chain", &self.chain)
            .field("amount", &self.deposit.amount)
            .finish()
    }
}

/// Ordered credentials for one batch, in validator index order
///
/// Owns all derived key material; secret keys are zeroized when the list
/// is dropped.
#[derive(Debug)]
pub struct CredentialList {
    credentials: Vec<Credential>,
}

impl CredentialList {
    /// Derive `num_keys` validators starting at `start_index`
    ///
    /// `amounts` holds one amount per validator. Derivation runs on the
    /// rayon pool; only the seed is shared between workers.
    pub fn from_mnemonic(
        mnemonic: &Mnemonic,
        passphrase: &str,
        num_keys: u32,
        amounts: &[u64],
        start_index: u32,
        chain: &ChainIdentity,
    ) -> CryptoResult<Self> {
        if amounts.len() != num_keys as usize {
            return Err(CryptoError::AmountCountMismatch {
                expected: num_keys as usize,
                actual: amounts.len(),
            });
        }
        if start_index.checked_add(num_keys).is_none() {
            return Err(CryptoError::IndexOverflow {
                start: start_index,
                count: num_keys,
            });
        }

        info!(
            num_keys,
            start_index,
            network = %chain.network_name,
            language = %mnemonic.language(),
            "Deriving validator credentials"
        );

        let seed = mnemonic.to_seed(passphrase);
        let credentials = amounts
            .par_iter()
            .enumerate()
            .map(|(offset, amount)| {
                Credential::new(
                    seed.expose_secret(),
                    start_index + offset as u32,
                    *amount,
                    chain,
                )
            })
            .collect::<CryptoResult<Vec<_>>>()?;

        Ok(Self { credentials })
    }

    /// Credentials in index order
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Encrypt every signing key and write the keystores into `folder`
    ///
    /// Returns the file paths in index order.
    pub fn export_keystores(
        &self,
        password: &str,
        folder: &Path,
        kdf: KdfConfig,
    ) -> CryptoResult<Vec<PathBuf>> {
        info!(count = self.len(), folder = %folder.display(), "Exporting keystores");
        let timestamp = chrono::Utc::now().timestamp();

        self.credentials
            .par_iter()
            .map(|c| c.save_signing_keystore(password, folder, kdf, timestamp))
            .collect()
    }

    /// Deposit records in index order
    pub fn deposit_records(&self) -> Vec<DepositDataJson> {
        self.credentials.iter().map(Credential::deposit_json).collect()
    }

    /// Write `deposit_data-{timestamp}.json` into `folder`
    pub fn export_deposit_data_json(&self, folder: &Path) -> CryptoResult<PathBuf> {
        let timestamp = chrono::Utc::now().timestamp();
        let path = folder.join(format!("deposit_data-{timestamp}.json"));

        let json = serde_json::to_string_pretty(&self.deposit_records())?;
        fs::write(&path, json)?;

        info!(path = %path.display(), "Exported deposit data");
        Ok(path)
    }

    /// Verify written keystores against the stored public keys and against
    /// this list's own secret keys
    ///
    /// `paths` must be in index order, as returned by `export_keystores`.
    pub fn verify_keystores(&self, paths: &[PathBuf], password: &str) -> VerificationReport {
        if paths.len() != self.len() {
            let mut report = verify::verify_keystores(paths, password);
            report.failures.push(VerificationFailure {
                subject: "keystores".to_string(),
                error: VerifyError::Malformed(format!(
                    "expected {} keystores, got {}",
                    self.len(),
                    paths.len()
                )),
            });
            return report;
        }

        info!(count = paths.len(), "Verifying keystores against credentials");
        let results: Vec<_> = self
            .credentials
            .par_iter()
            .zip(paths.par_iter())
            .map(|(credential, path)| {
                (
                    path.display().to_string(),
                    credential.verify_keystore(path, password),
                )
            })
            .collect();

        VerificationReport::from_results(results)
    }
}
