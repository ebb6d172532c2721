//! Domain separation and signing of deposit messages

use super::types::{DepositData, DepositMessage, ForkData, ForkVersion, SigningData};
use super::{DepositError, DepositResult};
use crate::bls::{BlsPublicKey, BlsSecretKey, BlsSignature};
use crate::hash::{Root, TreeHash};

/// Domain type for deposits
pub const DOMAIN_DEPOSIT: [u8; 4] = [0x03, 0x00, 0x00, 0x00];

/// Withdrawal credential prefix for BLS withdrawal keys
pub const BLS_WITHDRAWAL_PREFIX: u8 = 0x00;

/// Largest deposit accepted, in gwei (32 ETH)
pub const MAX_DEPOSIT_AMOUNT: u64 = 32_000_000_000;

/// Smallest deposit accepted, in gwei (1 ETH)
pub const MIN_DEPOSIT_AMOUNT: u64 = 1_000_000_000;

/// `0x00 || sha256(withdrawal_pubkey)[1..32]`
pub fn withdrawal_credentials(withdrawal_pubkey: &BlsPublicKey) -> [u8; 32] {
    let mut credentials = withdrawal_pubkey.hash();
    credentials[0] = BLS_WITHDRAWAL_PREFIX;
    credentials
}

/// Build the unsigned deposit message for a validator
pub fn build_message(
    signing_pubkey: &BlsPublicKey,
    withdrawal_pubkey: &BlsPublicKey,
    amount: u64,
) -> DepositResult<DepositMessage> {
    if !(MIN_DEPOSIT_AMOUNT..=MAX_DEPOSIT_AMOUNT).contains(&amount) {
        return Err(DepositError::InvalidAmount(amount));
    }

    Ok(DepositMessage {
        pubkey: signing_pubkey.to_bytes().into(),
        withdrawal_credentials: withdrawal_credentials(withdrawal_pubkey).into(),
        amount,
    })
}

/// Deposit domain for a fork version
///
/// Deposits are valid across forks, so the genesis validators root is
/// always zero.
pub fn compute_deposit_domain(fork_version: ForkVersion) -> Root {
    let fork_data_root = ForkData {
        current_version: fork_version,
        genesis_validators_root: Root::ZERO,
    }
    .tree_hash_root();

    let mut domain = Root::ZERO;
    domain[..4].copy_from_slice(&DOMAIN_DEPOSIT);
    domain[4..].copy_from_slice(&fork_data_root[..28]);
    domain
}

/// Root that is actually signed: the message root bound to the chain's domain
pub fn signing_root(message: &DepositMessage, fork_version: ForkVersion) -> Root {
    SigningData {
        object_root: message.tree_hash_root(),
        domain: compute_deposit_domain(fork_version),
    }
    .tree_hash_root()
}

/// Sign a signing root
pub fn sign(signing_key: &BlsSecretKey, signing_root: &Root) -> BlsSignature {
    signing_key.sign(signing_root.as_slice())
}

/// Attach a signature to a message
pub fn finalize(message: &DepositMessage, signature: &BlsSignature) -> DepositData {
    DepositData {
        pubkey: message.pubkey,
        withdrawal_credentials: message.withdrawal_credentials,
        amount: message.amount,
        signature: signature.to_bytes().into(),
    }
}
