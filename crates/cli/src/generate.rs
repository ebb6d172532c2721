//! Key generation shared by `new-mnemonic` and `existing-mnemonic`
//!
//! Writes every keystore and the deposit-data file, then re-reads and
//! verifies all of them before reporting success.

use anyhow::{bail, Context, Result};
use deposit_crypto::deposit::MAX_DEPOSIT_AMOUNT;
use deposit_crypto::{verify_deposit_data_json, CredentialList, KdfConfig, Mnemonic};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::settings::ChainSetting;

/// Folder name for generated artifacts
pub const DEFAULT_VALIDATOR_KEYS_FOLDER_NAME: &str = "validator_keys";

/// Inputs for one key-generation run
pub struct GenerateOptions<'a> {
    pub mnemonic: &'a Mnemonic,
    pub mnemonic_password: &'a str,
    pub start_index: u32,
    pub num_validators: u32,
    pub chain: ChainSetting,
    pub folder: &'a Path,
    pub kdf: KdfConfig,
    pub password: &'a str,
}

/// Where the artifacts of a run were written
#[derive(Debug)]
pub struct GeneratedArtifacts {
    pub folder: PathBuf,
    pub keystores: Vec<PathBuf>,
    pub deposit_data: PathBuf,
}

/// Create a directory with owner-only permissions if it does not exist
pub fn ensure_keys_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).context("Failed to create validator keys directory")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o700);
            fs::set_permissions(dir, perms).context("Failed to set directory permissions")?;
        }
    }
    Ok(())
}

/// Derive, sign, export and verify a batch of validator credentials
pub fn generate_keys(opts: &GenerateOptions<'_>) -> Result<GeneratedArtifacts> {
    if opts.num_validators == 0 {
        bail!("Number of validators must be at least 1");
    }

    let folder = opts.folder.join(DEFAULT_VALIDATOR_KEYS_FOLDER_NAME);
    ensure_keys_dir(&folder)?;

    info!(
        chain = opts.chain.name,
        fork_version = %opts.chain.fork_version_hex(),
        num_validators = opts.num_validators,
        start_index = opts.start_index,
        "Creating your keys"
    );
    println!("Creating your keys.");

    let amounts = vec![MAX_DEPOSIT_AMOUNT; opts.num_validators as usize];
    let credentials = CredentialList::from_mnemonic(
        opts.mnemonic,
        opts.mnemonic_password,
        opts.num_validators,
        &amounts,
        opts.start_index,
        &opts.chain.identity(),
    )
    .context("Failed to derive validator credentials")?;

    println!("Creating your keystores.");
    let keystores = credentials
        .export_keystores(opts.password, &folder, opts.kdf)
        .context("Failed to write the keystores")?;

    println!("Creating your deposit data.");
    let deposit_data = credentials
        .export_deposit_data_json(&folder)
        .context("Failed to write the deposit data")?;

    println!("Verifying your keystores.");
    credentials
        .verify_keystores(&keystores, opts.password)
        .into_result()
        .context("Failed to verify the keystores")?;

    println!("Verifying your deposit data.");
    verify_deposit_data_json(&deposit_data)?
        .into_result()
        .context("Failed to verify the deposit data JSON files")?;

    Ok(GeneratedArtifacts {
        folder,
        keystores,
        deposit_data,
    })
}

/// Print the final location of the artifacts
pub fn print_success(artifacts: &GeneratedArtifacts) {
    println!();
    println!("Success!");
    println!(
        "Wrote {} keystore(s) and {}",
        artifacts.keystores.len(),
        artifacts.deposit_data.display()
    );
    println!("Your keys can be found at: {}", artifacts.folder.display());
    println!();
}
