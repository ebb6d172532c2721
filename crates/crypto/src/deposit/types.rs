//! SSZ containers of the deposit flow

use tree_hash_derive::TreeHash;

use crate::bls::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::hash::{FixedBytes, Root};

/// Four-byte fork version identifying a chain
pub type ForkVersion = [u8; 4];

/// Compressed BLS public key as stored in a deposit
pub type PubkeyBytes = FixedBytes<PUBLIC_KEY_LENGTH>;

/// Compressed BLS signature as stored in a deposit
pub type SignatureBytes = FixedBytes<SIGNATURE_LENGTH>;

/// `{pubkey, withdrawal_credentials, amount}`, the part of a deposit that is signed
///
/// Fields hold raw bytes so that records read from disk can be hashed
/// before any curve validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct DepositMessage {
    pub pubkey: PubkeyBytes,
    pub withdrawal_credentials: Root,
    /// Amount in gwei
    pub amount: u64,
}

/// A signed deposit
#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct DepositData {
    pub pubkey: PubkeyBytes,
    pub withdrawal_credentials: Root,
    pub amount: u64,
    pub signature: SignatureBytes,
}

impl DepositData {
    /// The unsigned message this deposit commits to
    pub fn message(&self) -> DepositMessage {
        DepositMessage {
            pubkey: self.pubkey,
            withdrawal_credentials: self.withdrawal_credentials,
            amount: self.amount,
        }
    }
}

/// Input to the domain computation
#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct ForkData {
    pub current_version: ForkVersion,
    pub genesis_validators_root: Root,
}

/// `{object_root, domain}`; its root is what gets signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, TreeHash)]
pub struct SigningData {
    pub object_root: Root,
    pub domain: Root,
}
