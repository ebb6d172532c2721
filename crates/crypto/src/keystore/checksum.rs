//! SHA-256 checksum module
//!
//! The checksum is computed over `derived_key[16..32] || ciphertext`, so it
//! fails for a wrong password as well as for tampered ciphertext.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::{KeystoreError, KeystoreResult};

const SHA256: &str = "sha256";

/// Checksum module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecksumModule {
    /// Checksum function identifier, always "sha256"
    pub function: String,
    /// Empty params (sha256 has no params)
    pub params: ChecksumParams,
    /// Checksum value as hex string
    pub message: String,
}

impl ChecksumModule {
    /// Create a new SHA-256 checksum module
    pub fn new(checksum: &[u8; 32]) -> Self {
        Self {
            function: SHA256.to_string(),
            params: ChecksumParams {},
            message: hex::encode(checksum),
        }
    }

    /// Check the function name
    pub fn validate(&self) -> KeystoreResult<()> {
        if self.function != SHA256 {
            return Err(KeystoreError::UnsupportedFunction {
                module: "checksum",
                function: self.function.clone(),
            });
        }
        Ok(())
    }

    /// Whether the stored checksum matches the derived key and ciphertext
    pub fn verify(&self, derived_key: &[u8], ciphertext: &[u8]) -> KeystoreResult<bool> {
        let expected =
            hex::decode(&self.message).map_err(|_| KeystoreError::InvalidHex("checksum message"))?;
        let computed = compute_checksum(derived_key, ciphertext)?;
        Ok(constant_time_eq(&expected, &computed))
    }
}

/// Empty params struct for SHA-256 (required by EIP-2335 schema)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChecksumParams {}

/// SHA-256 of `derived_key[16..32] || ciphertext`
pub fn compute_checksum(derived_key: &[u8], ciphertext: &[u8]) -> KeystoreResult<[u8; 32]> {
    let checksum_key = derived_key.get(16..32).ok_or_else(|| {
        KeystoreError::InvalidKdfParams(format!(
            "derived key must be at least 32 bytes, got {}",
            derived_key.len()
        ))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(checksum_key);
    hasher.update(ciphertext);
    Ok(hasher.finalize().into())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_uses_second_half_of_key() {
        let ciphertext = [0xCC; 32];

        let mut key1 = [0xAA; 32];
        let mut key2 = [0xBB; 32];
        key1[16..].copy_from_slice(&[0xFF; 16]);
        key2[16..].copy_from_slice(&[0xFF; 16]);

        let checksum1 = compute_checksum(&key1, &ciphertext).unwrap();
        assert_eq!(checksum1, compute_checksum(&key2, &ciphertext).unwrap());

        key2[16..].copy_from_slice(&[0xEE; 16]);
        assert_ne!(checksum1, compute_checksum(&key2, &ciphertext).unwrap());
    }

    #[test]
    fn test_short_key_rejected() {
        assert!(compute_checksum(&[0u8; 31], &[]).is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(&[1, 2, 3], &[1, 2, 3]));
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2, 4]));
        assert!(!constant_time_eq(&[1, 2, 3], &[1, 2]));
    }

    #[test]
    fn test_checksum_module_verify() {
        let derived_key = [0x11; 32];
        let ciphertext = [0x22; 32];

        let module = ChecksumModule::new(&compute_checksum(&derived_key, &ciphertext).unwrap());
        assert!(module.validate().is_ok());
        assert!(module.verify(&derived_key, &ciphertext).unwrap());
        assert!(!module.verify(&[0x33; 32], &ciphertext).unwrap());

        let mut tampered = ciphertext;
        tampered[0] ^= 1;
        assert!(!module.verify(&derived_key, &tampered).unwrap());
    }

    #[test]
    fn test_truncated_or_extended_checksum_rejected() {
        let derived_key = [0x11; 32];
        let ciphertext = [0x22; 32];
        let full = hex::encode(compute_checksum(&derived_key, &ciphertext).unwrap());

        let mut module = ChecksumModule::new(&[0; 32]);
        for stored in [&full[..4], &full[..62], ""] {
            module.message = stored.to_string();
            assert!(!module.verify(&derived_key, &ciphertext).unwrap(), "{stored}");
        }

        module.message = format!("{full}00");
        assert!(!module.verify(&derived_key, &ciphertext).unwrap());
    }

    #[test]
    fn test_checksum_module_serialization() {
        let module = ChecksumModule::new(&[0xEE; 32]);
        let json = serde_json::to_value(&module).unwrap();
        assert_eq!(json["function"], "sha256");
        assert_eq!(json["params"], serde_json::json!({}));

        let parsed: ChecksumModule = serde_json::from_value(json).unwrap();
        assert_eq!(module, parsed);
    }
}
