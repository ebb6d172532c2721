//! EIP-2335 keystore encryptor
//!
//! Each signing key is written as a version 4 keystore:
//!
//! - Password-based key derivation: scrypt (default) or PBKDF2-HMAC-SHA256
//! - AES-128-CTR encryption under the first half of the derived key
//! - SHA-256 checksum over the second half of the derived key and the
//!   ciphertext, checked before any plaintext is produced
//!
//! Passwords are NFKD-normalized and stripped of control characters.
//!
//! # Example
//!
//! ```rust,ignore
//! use deposit_crypto::keystore::{KdfConfig, Keystore};
//!
//! let keystore = Keystore::encrypt(&secret, "password", &pubkey_hex, &path, KdfConfig::scrypt())?;
//! keystore.save("./validator_keys/keystore.json")?;
//!
//! let loaded = Keystore::load("./validator_keys/keystore.json")?;
//! let secret = loaded.decrypt("password")?;
//! ```

mod checksum;
mod cipher;
mod encrypted;
mod error;
mod kdf;
mod password;

pub use checksum::{compute_checksum, ChecksumModule, ChecksumParams};
pub use cipher::{decrypt_secret, encrypt_secret, CipherModule, CipherParams, IV_LENGTH};
pub use encrypted::{CryptoModule, Keystore, KeystoreBuilder, KEYSTORE_VERSION};
pub use error::{KeystoreError, KeystoreResult};
pub use kdf::{
    pbkdf2_derive_key, scrypt_derive_key, KdfConfig, KdfModule, KdfParams, PBKDF2_C, SALT_LENGTH,
    SCRYPT_N,
};
pub use password::normalize_password;
