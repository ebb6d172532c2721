//! Cryptographic error types

use thiserror::Error;

use crate::deposit::DepositError;
use crate::derivation::DerivationError;
use crate::keystore::KeystoreError;
use crate::mnemonic::MnemonicError;
use crate::verify::VerifyError;

/// BLS12-381 cryptographic errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlsError {
    /// Invalid secret key bytes
    #[error("invalid secret key bytes")]
    InvalidSecretKey,

    /// Invalid public key bytes
    #[error("invalid public key bytes")]
    InvalidPublicKey,

    /// Invalid signature bytes
    #[error("invalid signature bytes")]
    InvalidSignature,

    /// Byte slice of the wrong length for the target type
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Top-level error for the credential pipeline.
///
/// Everything except [`MnemonicError`] is fatal for the current batch.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error(transparent)]
    Deposit(#[from] DepositError),

    #[error(transparent)]
    Keystore(#[from] KeystoreError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Bls(#[from] BlsError),

    /// Number of amounts does not match the number of validators
    #[error("expected {expected} deposit amounts, got {actual}")]
    AmountCountMismatch { expected: usize, actual: usize },

    /// Validator indices past `u32::MAX`
    #[error("validator indices {start}..{start}+{count} overflow")]
    IndexOverflow { start: u32, count: u32 },

    /// Verification of written artifacts failed
    #[error("verification failed for {0} artifact(s)")]
    VerificationFailed(usize),

    /// Filesystem failure while exporting artifacts
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure while exporting artifacts
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the credential pipeline
pub type CryptoResult<T> = Result<T, CryptoError>;
