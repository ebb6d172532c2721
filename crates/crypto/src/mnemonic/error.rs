//! Error types for mnemonic operations

use thiserror::Error;

use super::generate::WORD_COUNT;

/// Result type for mnemonic operations
pub type MnemonicResult<T> = Result<T, MnemonicError>;

/// Errors that can occur during mnemonic operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MnemonicError {
    /// Phrase does not have exactly 24 words
    #[error("seed phrase must contain exactly {expected} words, got {0}", expected = WORD_COUNT)]
    WrongWordCount(usize),

    /// One or more words are not in the active language's dictionary
    #[error("seed phrase contains words not in the {language} word list: {}", .words.join(", "))]
    UnknownWords {
        language: String,
        words: Vec<String>,
    },

    /// Checksum embedded in the last word does not match the entropy
    #[error("seed phrase checksum mismatch")]
    ChecksumMismatch,

    /// Entropy size other than the one this tool generates
    #[error("unsupported entropy size: {0} bits (must be 256)")]
    UnsupportedEntropy(usize),

    /// Operating system randomness could not be read
    #[error("insufficient entropy source: {0}")]
    InsufficientEntropySource(String),

    /// Language name that has no word list
    #[error("unknown mnemonic language: {0}")]
    UnknownLanguage(String),

    /// Any other phrase rejection reported by the BIP-39 codec
    #[error("invalid mnemonic phrase: {0}")]
    InvalidPhrase(String),
}

impl MnemonicError {
    /// Whether this is a phrase-entry mistake the user can correct by retyping.
    pub fn is_phrase_error(&self) -> bool {
        matches!(
            self,
            MnemonicError::WrongWordCount(_)
                | MnemonicError::UnknownWords { .. }
                | MnemonicError::ChecksumMismatch
                | MnemonicError::InvalidPhrase(_)
        )
    }
}
