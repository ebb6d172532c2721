//! Validator credential generation for proof-of-stake deposits
//!
//! This crate provides:
//! - BIP-39 mnemonics and seeds in every supported wordlist
//! - EIP-2333 key tree and EIP-2334 validator paths
//! - Deposit message construction, SSZ roots and BLS signing
//! - EIP-2335 keystores (scrypt / pbkdf2, aes-128-ctr)
//! - Verification of written keystores and deposit records
//!
//! The usual entry point is [`CredentialList::from_mnemonic`].

pub mod bls;
pub mod credentials;
pub mod deposit;
pub mod derivation;
pub mod error;
pub mod hash;
pub mod keys;
pub mod keystore;
pub mod mnemonic;
pub mod secure;
pub mod verify;

// BLS12-381 exports
pub use bls::{BlsKeyPair, BlsPublicKey, BlsSecretKey, BlsSignature, DST_POP};

// Credential pipeline exports
pub use credentials::{ChainIdentity, Credential, CredentialList};

// Deposit exports
pub use deposit::{DepositData, DepositDataJson, DepositError, DepositMessage, ForkVersion};

// Derivation exports
pub use derivation::{validator_keys, DerivationError};
pub use keys::ValidatorKeys;

// Error exports
pub use error::{BlsError, CryptoError, CryptoResult};

// Secure memory exports
pub use secrecy::ExposeSecret;
pub use secure::{SecretArray, SecretBytes, SecretString};

// Keystore exports
pub use keystore::{KdfConfig, Keystore, KeystoreBuilder, KeystoreError};

// Mnemonic exports
pub use mnemonic::{Language, Mnemonic, MnemonicError, Seed};

// Verification exports
pub use verify::{
    verify_deposit, verify_deposit_data_json, verify_deposit_records, verify_keystore,
    verify_keystores, VerificationFailure, VerificationReport, VerifyError,
};
