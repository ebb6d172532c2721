//! BIP-39 mnemonic codec
//!
//! Generates and validates the 24-word seed phrases from which every
//! validator key is derived, and stretches a phrase into the 64-byte seed.
//!
//! The language of a phrase is always explicit: a phrase is validated
//! against the word list it was written in, never guessed.
//!
//! # Example
//!
//! ```rust
//! use deposit_crypto::mnemonic::{Language, Mnemonic};
//!
//! let mnemonic = Mnemonic::generate(Language::English).unwrap();
//! let seed = mnemonic.to_seed("");
//! assert_eq!(seed.expose_secret().len(), 64);
//! ```
//!
//! # Security
//!
//! - Mnemonic phrases should be stored securely offline
//! - The same phrase and passphrase always produce the same keys
//! - A non-empty passphrase yields a completely different key tree

mod error;
mod generate;
mod language;

pub use error::{MnemonicError, MnemonicResult};
pub use generate::{Mnemonic, Seed, ENTROPY_BITS, SEED_LENGTH, WORD_COUNT};
pub use language::{Language, WordList};
