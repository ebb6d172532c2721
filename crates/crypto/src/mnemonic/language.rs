//! Mnemonic languages and their word lists
//!
//! The dictionaries themselves are the static BIP-39 tables shipped with the
//! `bip39` crate. The word → index maps are built once, on first use, and
//! shared read-only for the rest of the process.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bip39::Language as Bip39Language;
use once_cell::sync::Lazy;

use super::error::MnemonicError;

/// Languages a seed phrase can be written in.
///
/// The language is carried alongside every phrase; it is never guessed from
/// the words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    ChineseSimplified,
    ChineseTraditional,
    Czech,
    French,
    Italian,
    Japanese,
    Korean,
    Spanish,
}

impl Language {
    /// Every supported language, in word-list table order
    pub const ALL: [Language; 9] = [
        Language::English,
        Language::ChineseSimplified,
        Language::ChineseTraditional,
        Language::Czech,
        Language::French,
        Language::Italian,
        Language::Japanese,
        Language::Korean,
        Language::Spanish,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::ChineseSimplified => "chinese_simplified",
            Language::ChineseTraditional => "chinese_traditional",
            Language::Czech => "czech",
            Language::French => "french",
            Language::Italian => "italian",
            Language::Japanese => "japanese",
            Language::Korean => "korean",
            Language::Spanish => "spanish",
        }
    }

    /// The shared word list for this language
    pub fn word_list(self) -> &'static WordList {
        &WORD_LISTS[self as usize]
    }

    pub(crate) fn to_bip39(self) -> Bip39Language {
        match self {
            Language::English => Bip39Language::English,
            Language::ChineseSimplified => Bip39Language::SimplifiedChinese,
            Language::ChineseTraditional => Bip39Language::TraditionalChinese,
            Language::Czech => Bip39Language::Czech,
            Language::French => Bip39Language::French,
            Language::Italian => Bip39Language::Italian,
            Language::Japanese => Bip39Language::Japanese,
            Language::Korean => Bip39Language::Korean,
            Language::Spanish => Bip39Language::Spanish,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = MnemonicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Language::ALL
            .into_iter()
            .find(|lang| lang.name() == wanted)
            .ok_or_else(|| MnemonicError::UnknownLanguage(s.to_string()))
    }
}

/// A fixed 2048-word dictionary with constant-time reverse lookup
pub struct WordList {
    language: Language,
    words: &'static [&'static str; 2048],
    index: HashMap<&'static str, u16>,
}

impl WordList {
    fn build(language: Language) -> Self {
        let words = language.to_bip39().word_list();
        let index = words
            .iter()
            .enumerate()
            .map(|(i, word)| (*word, i as u16))
            .collect();
        Self {
            language,
            words,
            index,
        }
    }

    /// Language of this dictionary
    pub fn language(&self) -> Language {
        self.language
    }

    /// Index of a (normalized) word, if it is in the dictionary
    pub fn index_of(&self, word: &str) -> Option<u16> {
        self.index.get(word).copied()
    }

    /// Whether the (normalized) word is in the dictionary
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Word at a given index
    pub fn word(&self, index: u16) -> Option<&'static str> {
        self.words.get(index as usize).copied()
    }

    /// Number of words (always 2048)
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Debug for WordList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WordList")
            .field("language", &self.language)
            .field("len", &self.words.len())
            .finish()
    }
}

static WORD_LISTS: Lazy<Vec<WordList>> =
    Lazy::new(|| Language::ALL.into_iter().map(WordList::build).collect());
