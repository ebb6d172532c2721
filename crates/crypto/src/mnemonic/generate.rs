//! Mnemonic phrase generation, validation and seed derivation
//!
//! Implements the BIP-39 codec for the fixed 24-word / 256-bit phrases used
//! by validator credentials.

use std::borrow::Cow;

use bip39::Mnemonic as Bip39Mnemonic;
use rand::rngs::OsRng;
use rand::RngCore;
use secrecy::ExposeSecret;
use zeroize::Zeroize;

use super::error::{MnemonicError, MnemonicResult};
use super::language::Language;
use crate::secure::{SecretArray, SecretString};

/// Entropy size of every generated phrase
pub const ENTROPY_BITS: usize = 256;

/// Word count of every accepted phrase
pub const WORD_COUNT: usize = 24;

/// Seed length produced by the BIP-39 key stretching
pub const SEED_LENGTH: usize = 64;

/// Binary seed derived from a phrase and passphrase. Zeroized on drop.
pub type Seed = SecretArray<SEED_LENGTH>;

/// BIP-39 mnemonic phrase together with the language it was written in
///
/// # Security
///
/// - The phrase is stored as a `SecretString`, zeroized on drop
/// - Custom `Debug` implementation hides the actual phrase
///
/// # Example
///
/// ```rust
/// use deposit_crypto::mnemonic::{Language, Mnemonic};
///
/// let mnemonic = Mnemonic::generate(Language::English).unwrap();
/// assert_eq!(mnemonic.word_count(), 24);
///
/// let again = Mnemonic::from_phrase(mnemonic.phrase(), Language::English).unwrap();
/// assert!(mnemonic.matches(again.phrase()));
/// ```
pub struct Mnemonic {
    // bip39::Mnemonic only holds word indices; the text lives in `phrase`
    inner: Bip39Mnemonic,
    language: Language,
    phrase: SecretString,
}

impl Mnemonic {
    /// Generate a new random 24-word phrase from operating system entropy
    ///
    /// # Errors
    ///
    /// Returns `MnemonicError::InsufficientEntropySource` if the OS random
    /// source cannot be read.
    pub fn generate(language: Language) -> MnemonicResult<Self> {
        Self::generate_with_entropy(language, ENTROPY_BITS)
    }

    /// Generate a phrase for an explicit entropy size.
    ///
    /// Only 256 bits is accepted; any other size is `UnsupportedEntropy`.
    pub fn generate_with_entropy(language: Language, entropy_bits: usize) -> MnemonicResult<Self> {
        if entropy_bits != ENTROPY_BITS {
            return Err(MnemonicError::UnsupportedEntropy(entropy_bits));
        }

        let mut entropy = [0u8; ENTROPY_BITS / 8];
        OsRng
            .try_fill_bytes(&mut entropy)
            .map_err(|e| MnemonicError::InsufficientEntropySource(e.to_string()))?;

        let result = Self::from_entropy(language, &entropy);
        entropy.zeroize();
        result
    }

    /// Encode caller-supplied entropy (exactly 32 bytes) as a phrase
    pub fn from_entropy(language: Language, entropy: &[u8]) -> MnemonicResult<Self> {
        if entropy.len() * 8 != ENTROPY_BITS {
            return Err(MnemonicError::UnsupportedEntropy(entropy.len() * 8));
        }

        let inner = Bip39Mnemonic::from_entropy_in(language.to_bip39(), entropy)
            .map_err(|e| MnemonicError::InvalidPhrase(e.to_string()))?;
        let phrase = inner.words().collect::<Vec<_>>().join(" ");

        Ok(Self {
            inner,
            language,
            phrase: phrase.into(),
        })
    }

    /// Import a phrase written in `language`
    ///
    /// The phrase is NFKD-normalized, lowercased and whitespace-collapsed
    /// before validation.
    ///
    /// # Errors
    ///
    /// - `WrongWordCount` unless there are exactly 24 words
    /// - `UnknownWords` listing every word missing from the dictionary
    /// - `ChecksumMismatch` if the embedded checksum does not match
    pub fn from_phrase(phrase: &str, language: Language) -> MnemonicResult<Self> {
        let normalized = normalize_phrase(phrase);
        let inner = parse_normalized(&normalized, language)?;

        Ok(Self {
            inner,
            language,
            phrase: normalized.into(),
        })
    }

    /// Validate a phrase against a language without keeping it around
    pub fn validate(phrase: &str, language: Language) -> MnemonicResult<()> {
        let normalized = normalize_phrase(phrase);
        parse_normalized(&normalized, language).map(|_| ())
    }

    /// Get the mnemonic phrase
    ///
    /// The returned reference should be used immediately and not stored.
    pub fn phrase(&self) -> &str {
        self.phrase.expose_secret()
    }

    /// Language the phrase was generated or validated in
    pub fn language(&self) -> Language {
        self.language
    }

    /// Get the number of words in the mnemonic
    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// Whether a re-typed phrase is the same phrase in the same language
    ///
    /// Used by confirmation prompts; normalization is applied to `typed`.
    pub fn matches(&self, typed: &str) -> bool {
        let mut typed = normalize_phrase(typed);
        let same = typed == self.phrase();
        typed.zeroize();
        same
    }

    /// Derive the 64-byte seed (PBKDF2-HMAC-SHA512, 2048 rounds)
    ///
    /// The salt is `"mnemonic"` followed by the NFKD-normalized passphrase.
    /// This is intentionally slow.
    pub fn to_seed(&self, passphrase: &str) -> Seed {
        SecretArray::take(&mut self.inner.to_seed(passphrase))
    }

    /// Get the raw entropy bytes
    ///
    /// The entropy recreates the phrase; handle it like the phrase itself.
    pub fn entropy(&self) -> SecretArray<32> {
        let (mut bytes, len) = self.inner.to_entropy_array();
        let mut entropy = [0u8; 32];
        entropy.copy_from_slice(&bytes[..len.min(32)]);
        bytes.zeroize();
        SecretArray::take(&mut entropy)
    }
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mnemonic")
            .field("language", &self.language)
            .field("word_count", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

/// NFKD-normalize, lowercase and collapse whitespace
pub(crate) fn normalize_phrase(phrase: &str) -> String {
    let mut cow = Cow::Borrowed(phrase);
    Bip39Mnemonic::normalize_utf8_cow(&mut cow);
    let lowered = cow.to_lowercase();
    if let Cow::Owned(mut owned) = cow {
        owned.zeroize();
    }
    let mut lowered = lowered;
    let joined = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    lowered.zeroize();
    joined
}

fn parse_normalized(normalized: &str, language: Language) -> MnemonicResult<Bip39Mnemonic> {
    let words: Vec<&str> = normalized.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() != WORD_COUNT {
        return Err(MnemonicError::WrongWordCount(words.len()));
    }

    let list = language.word_list();
    let mut unknown: Vec<String> = words
        .iter()
        .filter(|w| !list.contains(w))
        .map(|w| w.to_string())
        .collect();
    if !unknown.is_empty() {
        unknown.sort();
        unknown.dedup();
        return Err(MnemonicError::UnknownWords {
            language: language.to_string(),
            words: unknown,
        });
    }

    Bip39Mnemonic::parse_in_normalized(language.to_bip39(), normalized).map_err(|e| match e {
        bip39::Error::InvalidChecksum => MnemonicError::ChecksumMismatch,
        bip39::Error::BadWordCount(n) => MnemonicError::WrongWordCount(n),
        other => MnemonicError::InvalidPhrase(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// BIP-39 vector: 32 zero bytes of entropy
    const ZERO_ENTROPY_PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";

    #[test]
    fn test_generate_24_word_mnemonic() {
        let mnemonic = Mnemonic::generate(Language::English).unwrap();
        assert_eq!(mnemonic.word_count(), 24);
        assert_eq!(mnemonic.phrase().split(' ').count(), 24);
        assert_eq!(mnemonic.language(), Language::English);
    }

    #[test]
    fn test_generated_phrase_validates_in_every_language() {
        for lang in Language::ALL {
            let mnemonic = Mnemonic::generate(lang).unwrap();
            assert!(Mnemonic::validate(mnemonic.phrase(), lang).is_ok(), "{lang}");
        }
    }

    #[test]
    fn test_unsupported_entropy() {
        let result = Mnemonic::generate_with_entropy(Language::English, 128);
        assert_eq!(result.unwrap_err(), MnemonicError::UnsupportedEntropy(128));
        assert!(Mnemonic::from_entropy(Language::English, &[0u8; 16]).is_err());
    }

    #[test]
    fn test_known_entropy_vector() {
        let mnemonic = Mnemonic::from_entropy(Language::English, &[0u8; 32]).unwrap();
        assert_eq!(mnemonic.phrase(), ZERO_ENTROPY_PHRASE);
        assert_eq!(mnemonic.entropy().expose_secret(), &[0u8; 32]);
    }

    #[test]
    fn test_known_seed_vector() {
        let mnemonic = Mnemonic::from_phrase(ZERO_ENTROPY_PHRASE, Language::English).unwrap();
        let seed = mnemonic.to_seed("TREZOR");
        assert_eq!(
            hex::encode(seed.expose_secret()),
            "bda85446c68413707090a52022edd26a1c9462295029f2e60cd7c4f2bbd3097170af7a4d73245cafa9c3cca8d561a7c3de6f5d4a10be8ed2a5e608d68f92fcc8"
        );
    }

    #[test]
    fn test_passphrase_changes_seed() {
        let mnemonic = Mnemonic::from_phrase(ZERO_ENTROPY_PHRASE, Language::English).unwrap();
        let a = mnemonic.to_seed("");
        let b = mnemonic.to_seed("extra");
        assert_ne!(a.expose_secret(), b.expose_secret());
    }

    #[test]
    fn test_from_phrase_normalizes_case_and_whitespace() {
        let messy = format!("  {}  ", ZERO_ENTROPY_PHRASE.to_uppercase().replace(' ', "   "));
        let mnemonic = Mnemonic::from_phrase(&messy, Language::English).unwrap();
        assert_eq!(mnemonic.phrase(), ZERO_ENTROPY_PHRASE);
    }

    #[test]
    fn test_wrong_word_count() {
        let short = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
        assert_eq!(
            Mnemonic::validate(short, Language::English).unwrap_err(),
            MnemonicError::WrongWordCount(12)
        );
    }

    #[test]
    fn test_unknown_words_are_listed() {
        let phrase = ZERO_ENTROPY_PHRASE
            .replacen("abandon", "zzzz", 1)
            .replacen("abandon", "qqqq", 1)
            .replacen("abandon", "zzzz", 1);
        match Mnemonic::validate(&phrase, Language::English).unwrap_err() {
            MnemonicError::UnknownWords { language, words } => {
                assert_eq!(language, "english");
                assert_eq!(words, vec!["qqqq".to_string(), "zzzz".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_checksum_mismatch() {
        // "abandon" x24 has valid words but the wrong checksum word
        let phrase = vec!["abandon"; 24].join(" ");
        assert_eq!(
            Mnemonic::validate(&phrase, Language::English).unwrap_err(),
            MnemonicError::ChecksumMismatch
        );
    }

    #[test]
    fn test_language_is_not_inferred() {
        let mnemonic = Mnemonic::generate(Language::English).unwrap();
        let err = Mnemonic::validate(mnemonic.phrase(), Language::Italian).unwrap_err();
        assert!(err.is_phrase_error());
    }

    #[test]
    fn test_matches_confirmation() {
        let mnemonic = Mnemonic::from_phrase(ZERO_ENTROPY_PHRASE, Language::English).unwrap();
        assert!(mnemonic.matches(&ZERO_ENTROPY_PHRASE.to_uppercase()));
        assert!(!mnemonic.matches("abandon art"));
    }

    #[test]
    fn test_debug_output_redacted() {
        let mnemonic = Mnemonic::from_phrase(ZERO_ENTROPY_PHRASE, Language::English).unwrap();
        let debug = format!("{:?}", mnemonic);

        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("abandon"));
    }
}
