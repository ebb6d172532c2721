//! Per-chain deposit settings
//!
//! Only the fork version differs between chains; everything else in the
//! deposit domain is fixed.

use anyhow::{anyhow, Result};
use deposit_crypto::{ChainIdentity, ForkVersion};

/// Chain used when neither the flag nor the config file names one
pub const DEFAULT_CHAIN: &str = "mainnet";

/// Settings for one supported chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainSetting {
    pub name: &'static str,
    pub genesis_fork_version: ForkVersion,
}

pub const MAINNET: ChainSetting = ChainSetting {
    name: "mainnet",
    genesis_fork_version: [0x00, 0x00, 0x00, 0x00],
};

pub const PYRMONT: ChainSetting = ChainSetting {
    name: "pyrmont",
    genesis_fork_version: [0x00, 0x00, 0x20, 0x09],
};

pub const PRATER: ChainSetting = ChainSetting {
    name: "prater",
    genesis_fork_version: [0x00, 0x00, 0x10, 0x20],
};

/// Every chain the tool can sign deposits for
pub const ALL_CHAINS: [ChainSetting; 3] = [MAINNET, PYRMONT, PRATER];

impl ChainSetting {
    /// Identity handed to the credential pipeline
    pub fn identity(&self) -> ChainIdentity {
        ChainIdentity {
            network_name: self.name.to_string(),
            fork_version: self.genesis_fork_version,
        }
    }

    /// Fork version as lowercase hex
    pub fn fork_version_hex(&self) -> String {
        hex::encode(self.genesis_fork_version)
    }
}

/// Look up a chain by name, ignoring case
pub fn get_chain_setting(name: &str) -> Result<ChainSetting> {
    let wanted = name.trim().to_lowercase();
    ALL_CHAINS
        .into_iter()
        .find(|chain| chain.name == wanted)
        .ok_or_else(|| {
            let known: Vec<&str> = ALL_CHAINS.iter().map(|c| c.name).collect();
            anyhow!("Unknown chain '{}' (expected one of: {})", name, known.join(", "))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(get_chain_setting("Prater").unwrap(), PRATER);
        assert_eq!(get_chain_setting(" MAINNET ").unwrap(), MAINNET);
    }

    #[test]
    fn test_unknown_chain() {
        let err = get_chain_setting("goerli").unwrap_err().to_string();
        assert!(err.contains("goerli"));
        assert!(err.contains("pyrmont"));
    }

    #[test]
    fn test_fork_versions() {
        assert_eq!(MAINNET.fork_version_hex(), "00000000");
        assert_eq!(PYRMONT.fork_version_hex(), "00002009");
        assert_eq!(PRATER.fork_version_hex(), "00001020");
        assert_eq!(PRATER.identity().network_name, "prater");
    }
}
