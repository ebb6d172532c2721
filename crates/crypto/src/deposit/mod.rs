//! Deposit message builder and signer
//!
//! Builds the phase 0 `DepositMessage` for a validator, binds it to a chain
//! through the deposit domain, signs the resulting signing root, and
//! serializes the finished `DepositData` into the JSON record consumed by
//! the deposit launchpad.

mod json;
mod signing;
mod types;

use thiserror::Error;

pub use json::{DepositDataJson, DEPOSIT_CLI_VERSION};
pub use signing::{
    build_message, compute_deposit_domain, finalize, sign, signing_root, withdrawal_credentials,
    BLS_WITHDRAWAL_PREFIX, DOMAIN_DEPOSIT, MAX_DEPOSIT_AMOUNT, MIN_DEPOSIT_AMOUNT,
};
pub use types::{
    DepositData, DepositMessage, ForkData, ForkVersion, PubkeyBytes, SignatureBytes, SigningData,
};

/// Errors from building or decoding deposits
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DepositError {
    /// Amount outside the accepted deposit range (gwei)
    #[error("deposit amount {0} gwei is outside [{min}, {max}]", min = MIN_DEPOSIT_AMOUNT, max = MAX_DEPOSIT_AMOUNT)]
    InvalidAmount(u64),

    /// A hex field of a deposit record could not be decoded
    #[error("invalid hex in field '{field}'")]
    InvalidHex { field: &'static str },
}

/// Result type for deposit operations
pub type DepositResult<T> = Result<T, DepositError>;
