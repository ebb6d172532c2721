//! BLS12-381 operations for validator credentials
//!
//! This module wraps `blst` with:
//! - the min_pk variant (48-byte public keys, 96-byte signatures)
//! - the proof-of-possession ciphersuite used by the deposit protocol
//! - redacted `Debug` output and hex serde for JSON artifacts

use crate::error::BlsError;
use blst::min_pk::{PublicKey as BlstPubKey, SecretKey as BlstSecKey, Signature as BlstSig};
use blst::BLST_ERROR;
use serde::{Deserialize, Serialize};

/// Ciphersuite tag for the proof-of-possession scheme
pub const DST_POP: &[u8] = b"BLS_SIG_BLS12381G2_XMD:SHA-256_SSWU_RO_POP_";

/// Secret key length in bytes
pub const SECRET_KEY_LENGTH: usize = 32;

/// Compressed public key length in bytes
pub const PUBLIC_KEY_LENGTH: usize = 48;

/// Compressed signature length in bytes
pub const SIGNATURE_LENGTH: usize = 96;

/// BLS12-381 secret key (32-byte big-endian scalar)
///
/// The inner `blst` scalar is zeroized on drop.
#[derive(Clone)]
pub struct BlsSecretKey(BlstSecKey);

impl BlsSecretKey {
    /// Load from a big-endian scalar; must be non-zero and below the curve order
    pub fn from_bytes(bytes: &[u8; SECRET_KEY_LENGTH]) -> Result<Self, BlsError> {
        BlstSecKey::from_bytes(bytes)
            .map(Self)
            .map_err(|_| BlsError::InvalidSecretKey)
    }

    /// Load from an arbitrary slice, checking its length first
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BlsError> {
        let arr: &[u8; SECRET_KEY_LENGTH] =
            bytes.try_into().map_err(|_| BlsError::InvalidLength {
                expected: SECRET_KEY_LENGTH,
                actual: bytes.len(),
            })?;
        Self::from_bytes(arr)
    }

    /// Serialize to bytes
    ///
    /// The caller owns the copy and is responsible for zeroizing it.
    pub fn to_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Get the corresponding public key
    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey(self.0.sk_to_pk())
    }

    /// Sign a 32-byte signing root. Deterministic for a given key and message.
    pub fn sign(&self, msg: &[u8]) -> BlsSignature {
        BlsSignature(self.0.sign(msg, DST_POP, &[]))
    }
}

impl std::fmt::Debug for BlsSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlsSecretKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// BLS12-381 public key (48 bytes compressed)
#[derive(Clone, PartialEq, Eq)]
pub struct BlsPublicKey(BlstPubKey);

impl BlsPublicKey {
    /// Load from bytes (48 bytes compressed), rejecting points outside the subgroup
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LENGTH]) -> Result<Self, BlsError> {
        BlstPubKey::key_validate(bytes)
            .map(Self)
            .map_err(|_| BlsError::InvalidPublicKey)
    }

    /// Parse from hex, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, BlsError> {
        let bytes = decode_hex_fixed::<PUBLIC_KEY_LENGTH>(s).ok_or(BlsError::InvalidPublicKey)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize to bytes (48 bytes compressed)
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0.to_bytes()
    }

    /// Lowercase hex without prefix, as written into keystores and deposit files
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verify a signature over `msg`
    pub fn verify(&self, msg: &[u8], sig: &BlsSignature) -> bool {
        sig.verify(msg, self)
    }

    /// SHA-256 of the compressed key (used for withdrawal credentials)
    pub fn hash(&self) -> [u8; 32] {
        crate::hash::sha256(&self.to_bytes()).0
    }
}

impl std::fmt::Debug for BlsPublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "BlsPublicKey({})", hex::encode(&bytes[..8]))
    }
}

impl Serialize for BlsPublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlsPublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// BLS12-381 signature (96 bytes compressed)
#[derive(Clone)]
pub struct BlsSignature(BlstSig);

impl BlsSignature {
    /// Load from bytes (96 bytes), rejecting points outside the subgroup
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LENGTH]) -> Result<Self, BlsError> {
        BlstSig::sig_validate(bytes, true)
            .map(Self)
            .map_err(|_| BlsError::InvalidSignature)
    }

    /// Parse from hex, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, BlsError> {
        let bytes = decode_hex_fixed::<SIGNATURE_LENGTH>(s).ok_or(BlsError::InvalidSignature)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        self.0.to_bytes()
    }

    /// Lowercase hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Verify signature against public key
    pub fn verify(&self, msg: &[u8], pubkey: &BlsPublicKey) -> bool {
        self.0.verify(true, msg, DST_POP, &[], &pubkey.0, true) == BLST_ERROR::BLST_SUCCESS
    }
}

impl std::fmt::Debug for BlsSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.to_bytes();
        write!(f, "BlsSignature({})", hex::encode(&bytes[..8]))
    }
}

impl PartialEq for BlsSignature {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for BlsSignature {}

impl Serialize for BlsSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlsSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// BLS key pair (convenience wrapper)
#[derive(Clone)]
pub struct BlsKeyPair {
    pub secret_key: BlsSecretKey,
    pub public_key: BlsPublicKey,
}

impl BlsKeyPair {
    /// Create from secret key
    pub fn from_secret_key(secret_key: BlsSecretKey) -> Self {
        let public_key = secret_key.public_key();
        Self {
            secret_key,
            public_key,
        }
    }

    /// Sign a signing root
    pub fn sign(&self, msg: &[u8]) -> BlsSignature {
        self.secret_key.sign(msg)
    }
}

impl std::fmt::Debug for BlsKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Decode hex (optional `0x`) into a fixed-size array
pub(crate) fn decode_hex_fixed<const N: usize>(s: &str) -> Option<[u8; N]> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(s).ok()?;
    bytes.try_into().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keypair(fill: u8) -> BlsKeyPair {
        let mut bytes = [fill; 32];
        // keep the scalar below the curve order
        bytes[0] = 0x01;
        BlsKeyPair::from_secret_key(BlsSecretKey::from_bytes(&bytes).unwrap())
    }

    #[test]
    fn test_sign_verify() {
        let kp = keypair(0x11);
        let msg = [0x42u8; 32];
        let sig = kp.sign(&msg);
        assert!(kp.public_key.verify(&msg, &sig));
        assert!(!kp.public_key.verify(&[0x43u8; 32], &sig));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let kp = keypair(0x22);
        let msg = [7u8; 32];
        assert_eq!(kp.sign(&msg), kp.sign(&msg));
    }

    #[test]
    fn test_wrong_key_rejects() {
        let kp1 = keypair(0x33);
        let kp2 = keypair(0x44);
        let msg = [9u8; 32];
        let sig = kp1.sign(&msg);
        assert!(!kp2.public_key.verify(&msg, &sig));
    }

    #[test]
    fn test_zero_secret_key_rejected() {
        assert!(matches!(
            BlsSecretKey::from_bytes(&[0u8; 32]),
            Err(BlsError::InvalidSecretKey)
        ));
    }

    #[test]
    fn test_from_slice_checks_length() {
        let result = BlsSecretKey::from_slice(&[1u8; 31]);
        assert!(matches!(
            result,
            Err(BlsError::InvalidLength {
                expected: 32,
                actual: 31
            })
        ));
    }

    #[test]
    fn test_hex_roundtrip_with_prefix() {
        let kp = keypair(0x55);
        let hex = kp.public_key.to_hex();
        assert_eq!(hex.len(), 96);
        let parsed = BlsPublicKey::from_hex(&format!("0x{hex}")).unwrap();
        assert_eq!(parsed, kp.public_key);

        let sig = kp.sign(&[1u8; 32]);
        let parsed_sig = BlsSignature::from_hex(&sig.to_hex()).unwrap();
        assert_eq!(parsed_sig, sig);
    }

    #[test]
    fn test_garbage_public_key_rejected() {
        assert!(BlsPublicKey::from_hex(&"ab".repeat(48)).is_err());
        assert!(BlsPublicKey::from_hex("abcd").is_err());
    }

    #[test]
    fn test_debug_output_redacted() {
        let kp = keypair(0x66);
        let debug = format!("{:?}", kp.secret_key);
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_pubkey_json_is_plain_hex() {
        let kp = keypair(0x77);
        let json = serde_json::to_string(&kp.public_key).unwrap();
        assert_eq!(json, format!("\"{}\"", kp.public_key.to_hex()));
        let restored: BlsPublicKey = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, kp.public_key);
    }
}
