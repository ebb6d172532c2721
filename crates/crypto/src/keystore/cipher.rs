//! AES-128-CTR cipher module
//!
//! The first 16 bytes of the derived key are the AES key; the cipher
//! preserves the plaintext length.

use aes::Aes128;
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// IV (initialization vector) length for AES-128-CTR
pub const IV_LENGTH: usize = 16;

/// AES-128 key length
pub const AES_KEY_LENGTH: usize = 16;

const AES_128_CTR: &str = "aes-128-ctr";

type Aes128Ctr = Ctr128BE<Aes128>;

/// Cipher module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CipherModule {
    /// Cipher function identifier, always "aes-128-ctr"
    pub function: String,
    pub params: CipherParams,
    /// Ciphertext as hex string
    pub message: String,
}

impl CipherModule {
    /// Create a new AES-128-CTR cipher module
    pub fn new(iv: &[u8; IV_LENGTH], ciphertext: &[u8]) -> Self {
        Self {
            function: AES_128_CTR.to_string(),
            params: CipherParams {
                iv: hex::encode(iv),
            },
            message: hex::encode(ciphertext),
        }
    }

    /// Check the function name and IV
    pub fn validate(&self) -> KeystoreResult<()> {
        if self.function != AES_128_CTR {
            return Err(KeystoreError::UnsupportedFunction {
                module: "cipher",
                function: self.function.clone(),
            });
        }
        self.iv().map(|_| ())
    }

    /// Get the IV bytes
    pub fn iv(&self) -> KeystoreResult<[u8; IV_LENGTH]> {
        let bytes =
            hex::decode(&self.params.iv).map_err(|_| KeystoreError::InvalidHex("cipher iv"))?;
        bytes.as_slice().try_into().map_err(|_| {
            KeystoreError::InvalidCipherParams(format!(
                "IV must be {} bytes, got {}",
                IV_LENGTH,
                bytes.len()
            ))
        })
    }

    /// Get the ciphertext bytes
    pub fn ciphertext(&self) -> KeystoreResult<Vec<u8>> {
        hex::decode(&self.message).map_err(|_| KeystoreError::InvalidHex("cipher message"))
    }
}

/// Cipher parameters for AES-128-CTR
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CipherParams {
    /// Initialization vector as hex string
    pub iv: String,
}

/// Apply the AES-128-CTR keystream. Encryption and decryption are the same operation.
fn apply_keystream(
    data: &mut [u8],
    derived_key: &[u8],
    iv: &[u8; IV_LENGTH],
) -> KeystoreResult<()> {
    let key: Zeroizing<[u8; AES_KEY_LENGTH]> = Zeroizing::new(
        derived_key
            .get(..AES_KEY_LENGTH)
            .and_then(|k| k.try_into().ok())
            .ok_or_else(|| {
                KeystoreError::InvalidCipherParams(format!(
                    "derived key must be at least {} bytes, got {}",
                    AES_KEY_LENGTH,
                    derived_key.len()
                ))
            })?,
    );

    let mut cipher = Aes128Ctr::new(&(*key).into(), &(*iv).into());
    cipher.apply_keystream(data);
    Ok(())
}

/// Encrypt a secret under the first half of the derived key
pub fn encrypt_secret(
    secret: &[u8],
    derived_key: &[u8],
    iv: &[u8; IV_LENGTH],
) -> KeystoreResult<Vec<u8>> {
    let mut ciphertext = secret.to_vec();
    apply_keystream(&mut ciphertext, derived_key, iv)?;
    Ok(ciphertext)
}

/// Decrypt a ciphertext under the first half of the derived key
///
/// Performs no integrity check; the checksum must be verified first.
pub fn decrypt_secret(
    ciphertext: &[u8],
    derived_key: &[u8],
    iv: &[u8; IV_LENGTH],
) -> KeystoreResult<SecretBytes> {
    let mut plaintext = Zeroizing::new(ciphertext.to_vec());
    apply_keystream(&mut plaintext, derived_key, iv)?;
    Ok(SecretBytes::new(Box::new(std::mem::take(&mut *plaintext))))
}
