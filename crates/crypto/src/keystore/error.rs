//! Keystore error types

use thiserror::Error;

/// Errors that can occur during keystore operations
#[derive(Error, Debug)]
pub enum KeystoreError {
    /// Checksum mismatch: wrong password or corrupted ciphertext
    #[error("invalid password: checksum verification failed")]
    InvalidPassword,

    /// The operating system random source could not be read
    #[error("entropy source unavailable: {0}")]
    EntropyUnavailable(String),

    /// Password is empty after normalization
    #[error("password must not be empty")]
    EmptyPassword,

    /// No secret was supplied to the builder
    #[error("no secret to encrypt")]
    MissingSecret,

    /// Unknown function name in one of the crypto modules
    #[error("unsupported {module} function: {function}")]
    UnsupportedFunction {
        module: &'static str,
        function: String,
    },

    /// Keystore schema version other than 4
    #[error("unsupported keystore version: {0}")]
    UnsupportedVersion(u32),

    /// Invalid KDF parameters
    #[error("invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    /// Invalid cipher parameters
    #[error("invalid cipher parameters: {0}")]
    InvalidCipherParams(String),

    /// Invalid hex encoding
    #[error("invalid hex in {0}")]
    InvalidHex(&'static str),

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    KdfFailure(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for keystore operations
pub type KeystoreResult<T> = Result<T, KeystoreError>;
