//! Hierarchical key derivation for BLS12-381 validator keys
//!
//! Implements the EIP-2333 key tree and the EIP-2334 path convention:
//!
//! ```text
//! m / 12381 / 3600 / index / 0        withdrawal key
//! m / 12381 / 3600 / index / 0 / 0    signing key
//! ```
//!
//! Every step is a pure function of the seed and the path; there is no
//! randomness after phrase generation.

mod path;
mod tree;

use thiserror::Error;

pub use path::{
    derive_sk_from_path, parse_path, signing_path, validator_keys, withdrawal_path, COIN_TYPE,
    PURPOSE,
};
pub use tree::{derive_child_sk, derive_master_sk, DerivedKey, MAX_KEYGEN_ATTEMPTS};

/// Errors from the key tree
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// HKDF_mod_r reduced to zero on every attempt
    #[error("key derivation exhausted after {0} attempts")]
    DerivationExhausted(usize),

    /// Seed shorter than the minimum input keying material
    #[error("seed must be at least {min} bytes, got {actual}")]
    SeedTooShort { min: usize, actual: usize },

    /// Malformed derivation path
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// Derived scalar rejected by the curve library
    #[error("derived key is not a valid BLS secret key")]
    InvalidKey,
}

/// Result type for key derivation
pub type DerivationResult<T> = Result<T, DerivationError>;
