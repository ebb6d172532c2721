//! Deposit-data JSON record

use serde::{Deserialize, Serialize};

use super::types::{DepositData, ForkVersion};
use super::{DepositError, DepositResult};
use crate::bls::decode_hex_fixed;
use crate::bls::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::hash::{Root, TreeHash};

/// Tool version recorded in every deposit record
pub const DEPOSIT_CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// One entry of `deposit_data-*.json`
///
/// All byte fields are lowercase hex without a `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositDataJson {
    pub pubkey: String,
    pub withdrawal_credentials: String,
    pub amount: u64,
    pub signature: String,
    pub deposit_message_root: String,
    pub deposit_data_root: String,
    pub fork_version: String,
    pub network_name: String,
    pub deposit_cli_version: String,
}

impl DepositDataJson {
    /// Render a signed deposit with both of its roots
    pub fn new(data: &DepositData, fork_version: ForkVersion, network_name: &str) -> Self {
        Self {
            pubkey: hex::encode(data.pubkey),
            withdrawal_credentials: hex::encode(data.withdrawal_credentials),
            amount: data.amount,
            signature: hex::encode(data.signature),
            deposit_message_root: hex::encode(data.message().tree_hash_root()),
            deposit_data_root: hex::encode(data.tree_hash_root()),
            fork_version: hex::encode(fork_version),
            network_name: network_name.to_string(),
            deposit_cli_version: DEPOSIT_CLI_VERSION.to_string(),
        }
    }

    /// Decode the byte fields back into a `DepositData` and its fork version
    ///
    /// The stored roots are not checked here.
    pub fn decode(&self) -> DepositResult<(DepositData, ForkVersion)> {
        let data = DepositData {
            pubkey: field::<PUBLIC_KEY_LENGTH>(&self.pubkey, "pubkey")?.into(),
            withdrawal_credentials: field::<32>(
                &self.withdrawal_credentials,
                "withdrawal_credentials",
            )?
            .into(),
            amount: self.amount,
            signature: field::<SIGNATURE_LENGTH>(&self.signature, "signature")?.into(),
        };
        let fork_version = field(&self.fork_version, "fork_version")?;
        Ok((data, fork_version))
    }

    /// Stored `deposit_message_root`
    pub fn message_root(&self) -> DepositResult<Root> {
        field::<32>(&self.deposit_message_root, "deposit_message_root").map(Root::from)
    }

    /// Stored `deposit_data_root`
    pub fn data_root(&self) -> DepositResult<Root> {
        field::<32>(&self.deposit_data_root, "deposit_data_root").map(Root::from)
    }
}

fn field<const N: usize>(value: &str, field: &'static str) -> DepositResult<[u8; N]> {
    decode_hex_fixed::<N>(value).ok_or(DepositError::InvalidHex { field })
}
