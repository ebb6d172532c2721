//! Optional `deposit.toml` with defaults for the key-generation commands
//!
//! # Example deposit.toml
//!
//! ```toml
//! # Chain to sign deposits for (mainnet|pyrmont|prater)
//! chain = "prater"
//!
//! # Word list for new phrases
//! mnemonic-language = "english"
//!
//! # Parent directory of validator_keys/
//! folder = "/var/lib/deposit"
//!
//! # Keystore key-derivation function (scrypt|pbkdf2)
//! kdf = "scrypt"
//! ```
//!
//! Command-line flags always take precedence over file values.

use anyhow::{Context, Result};
use deposit_crypto::{KdfConfig, Language};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::settings::{get_chain_setting, ChainSetting, DEFAULT_CHAIN};

/// Default configuration filename inside the home directory
pub const CONFIG_FILENAME: &str = "deposit.toml";

/// Values read from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DepositConfig {
    #[serde(default)]
    pub chain: Option<String>,

    #[serde(default)]
    pub mnemonic_language: Option<String>,

    #[serde(default)]
    pub folder: Option<PathBuf>,

    #[serde(default)]
    pub kdf: Option<String>,
}

impl DepositConfig {
    /// Default path of the config file
    pub fn config_path(home: &Path) -> PathBuf {
        home.join(CONFIG_FILENAME)
    }

    /// Load configuration.
    ///
    /// An explicitly given file must exist; a missing default file yields
    /// the default configuration.
    pub fn load(home: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let path = Self::config_path(home);
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))
    }

    /// Chain from the flag, then the file, then mainnet
    pub fn resolve_chain(&self, flag: Option<&str>) -> Result<ChainSetting> {
        let name = flag.or(self.chain.as_deref()).unwrap_or(DEFAULT_CHAIN);
        get_chain_setting(name)
    }

    /// Mnemonic language from the flag, then the file, then english
    pub fn resolve_language(&self, flag: Option<&str>) -> Result<Language> {
        match flag.or(self.mnemonic_language.as_deref()) {
            Some(name) => name.parse().context("Invalid mnemonic language"),
            None => Ok(Language::default()),
        }
    }

    /// Output folder from the flag, then the file, then the working directory
    pub fn resolve_folder(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.folder.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Keystore KDF from the flag, then the file, then scrypt
    pub fn resolve_kdf(&self, flag: Option<&str>) -> Result<KdfConfig> {
        match flag.or(self.kdf.as_deref()) {
            Some(name) => name.parse().context("Invalid keystore kdf"),
            None => Ok(KdfConfig::default()),
        }
    }
}
