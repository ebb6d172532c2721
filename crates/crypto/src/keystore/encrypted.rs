//! EIP-2335 keystore
//!
//! Combines the KDF, cipher and checksum modules into the version 4 JSON
//! container written for every signing key.

use std::fs;
use std::io::Write;
use std::path::Path;

use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::checksum::{compute_checksum, ChecksumModule};
use super::cipher::{decrypt_secret, encrypt_secret, CipherModule, IV_LENGTH};
use super::error::{KeystoreError, KeystoreResult};
use super::kdf::{KdfConfig, KdfModule, SALT_LENGTH};
use super::password::normalize_password;
use crate::secure::{SecretBytes, SecretString};

/// Version number for EIP-2335 keystores
pub const KEYSTORE_VERSION: u32 = 4;

/// EIP-2335 encrypted keystore
///
/// The public key and path are stored in clear so a keystore can be
/// identified without the password.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keystore {
    /// Crypto parameters (KDF + cipher + checksum)
    pub crypto: CryptoModule,
    #[serde(default)]
    pub description: String,
    /// Public key as lowercase hex
    pub pubkey: String,
    /// Derivation path of the encrypted key
    pub path: String,
    pub uuid: String,
    /// Schema version
    pub version: u32,
}

/// Combined crypto parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CryptoModule {
    pub kdf: KdfModule,
    pub checksum: ChecksumModule,
    pub cipher: CipherModule,
}

impl Keystore {
    /// Encrypt a secret with the given password and KDF work factor
    pub fn encrypt(
        secret: &[u8],
        password: &str,
        pubkey: &str,
        path: &str,
        kdf: KdfConfig,
    ) -> KeystoreResult<Self> {
        KeystoreBuilder::new()
            .secret(secret)
            .password(password)
            .pubkey(pubkey)
            .path(path)
            .kdf(kdf)
            .build()
    }

    /// Decrypt the keystore and return the secret
    ///
    /// # Errors
    ///
    /// Returns `KeystoreError::InvalidPassword` when the checksum does not
    /// match. No plaintext is produced in that case.
    pub fn decrypt(&self, password: &str) -> KeystoreResult<SecretBytes> {
        if self.version != KEYSTORE_VERSION {
            return Err(KeystoreError::UnsupportedVersion(self.version));
        }
        self.crypto.checksum.validate()?;
        self.crypto.cipher.validate()?;

        let password = normalize_password(password);
        let derived_key = self
            .crypto
            .kdf
            .derive_key(password.expose_secret().as_bytes())?;
        let dk_bytes = derived_key.expose_secret();

        let ciphertext = self.crypto.cipher.ciphertext()?;

        if !self.crypto.checksum.verify(dk_bytes, &ciphertext)? {
            return Err(KeystoreError::InvalidPassword);
        }

        let iv = self.crypto.cipher.iv()?;
        decrypt_secret(&ciphertext, dk_bytes, &iv)
    }

    /// Save keystore to a file
    ///
    /// Creates the file with restricted permissions (0600).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> KeystoreResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        file.write_all(json.as_bytes())?;

        // mode() only applies on creation
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    /// Load keystore from a file
    pub fn load<P: AsRef<Path>>(path: P) -> KeystoreResult<Self> {
        let contents = fs::read_to_string(path)?;
        let keystore: Self = serde_json::from_str(&contents)?;
        Ok(keystore)
    }

    /// Get the UUID
    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    /// Get the public key
    pub fn pubkey(&self) -> &str {
        &self.pubkey
    }

    /// Get the derivation path
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Builder for creating Keystore instances
#[derive(Default)]
pub struct KeystoreBuilder {
    secret: Option<Zeroizing<Vec<u8>>>,
    password: Option<SecretString>,
    pubkey: Option<String>,
    path: Option<String>,
    uuid: Option<String>,
    kdf: KdfConfig,
}

impl KeystoreBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the secret to encrypt
    pub fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = Some(Zeroizing::new(secret.to_vec()));
        self
    }

    /// Set the password; it is normalized before use
    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(normalize_password(password));
        self
    }

    /// Set the public key (hex encoded)
    pub fn pubkey(mut self, pubkey: &str) -> Self {
        self.pubkey = Some(pubkey.to_string());
        self
    }

    /// Set the derivation path
    pub fn path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }

    /// Set a custom UUID (normally auto-generated)
    pub fn uuid(mut self, uuid: &str) -> Self {
        self.uuid = Some(uuid.to_string());
        self
    }

    /// Choose the KDF and its work factor (default: scrypt, n=2^18)
    pub fn kdf(mut self, kdf: KdfConfig) -> Self {
        self.kdf = kdf;
        self
    }

    /// Build the keystore
    ///
    /// # Errors
    ///
    /// - `MissingSecret` / `EmptyPassword` for incomplete input
    /// - `EntropyUnavailable` if no salt or IV can be generated
    pub fn build(self) -> KeystoreResult<Keystore> {
        let secret = self.secret.ok_or(KeystoreError::MissingSecret)?;
        let password = self.password.ok_or(KeystoreError::EmptyPassword)?;
        if password.expose_secret().is_empty() {
            return Err(KeystoreError::EmptyPassword);
        }

        let salt: [u8; SALT_LENGTH] = random_bytes()?;
        let iv: [u8; IV_LENGTH] = random_bytes()?;

        let kdf = self.kdf.module(&salt);
        let derived_key = kdf.derive_key(password.expose_secret().as_bytes())?;
        let dk_bytes = derived_key.expose_secret();

        let ciphertext = encrypt_secret(&secret, dk_bytes, &iv)?;
        let checksum = compute_checksum(dk_bytes, &ciphertext)?;

        let crypto = CryptoModule {
            kdf,
            checksum: ChecksumModule::new(&checksum),
            cipher: CipherModule::new(&iv, &ciphertext),
        };

        Ok(Keystore {
            crypto,
            description: String::new(),
            pubkey: self.pubkey.unwrap_or_default(),
            path: self.path.unwrap_or_default(),
            uuid: self.uuid.unwrap_or_else(|| Uuid::new_v4().to_string()),
            version: KEYSTORE_VERSION,
        })
    }
}

fn random_bytes<const N: usize>() -> KeystoreResult<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| KeystoreError::EntropyUnavailable(e.to_string()))?;
    Ok(bytes)
}
