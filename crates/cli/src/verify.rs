//! `verify`: re-check an existing validator_keys folder

use anyhow::{bail, Context, Result};
use deposit_crypto::{verify_deposit_data_json, verify_keystores, VerificationFailure};
use std::fs;
use std::path::{Path, PathBuf};

/// Artifacts found in a validator_keys folder, sorted by file name
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FolderContents {
    pub keystores: Vec<PathBuf>,
    pub deposit_data: Vec<PathBuf>,
}

/// List keystore and deposit-data files in `folder`
pub fn scan_folder(folder: &Path) -> Result<FolderContents> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read folder: {}", folder.display()))?;

    let mut contents = FolderContents::default();
    for entry in entries {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.ends_with(".json") {
            continue;
        }
        if name.starts_with("keystore-") {
            contents.keystores.push(path);
        } else if name.starts_with("deposit_data-") {
            contents.deposit_data.push(path);
        }
    }

    contents.keystores.sort();
    contents.deposit_data.sort();
    Ok(contents)
}

/// Verify every keystore and deposit record in `folder`
///
/// Prints one line per failed artifact and fails if there was any.
pub fn verify_folder(folder: &Path, password: &str) -> Result<()> {
    let contents = scan_folder(folder)?;
    if contents.keystores.is_empty() {
        bail!("No keystores found in {}", folder.display());
    }
    if contents.deposit_data.is_empty() {
        bail!("No deposit data file found in {}", folder.display());
    }

    let mut failures: Vec<VerificationFailure> = Vec::new();

    println!("Verifying {} keystore(s).", contents.keystores.len());
    failures.extend(verify_keystores(&contents.keystores, password).failures);

    let mut records = 0;
    for file in &contents.deposit_data {
        let report = verify_deposit_data_json(file)
            .with_context(|| format!("Failed to read deposit data: {}", file.display()))?;
        records += report.checked;
        failures.extend(report.failures.into_iter().map(|f| VerificationFailure {
            subject: format!("{} ({})", file.display(), f.subject),
            error: f.error,
        }));
    }
    println!("Verifying {} deposit record(s).", records);

    if !failures.is_empty() {
        for failure in &failures {
            eprintln!("  FAILED {failure}");
        }
        bail!("{} artifact(s) failed verification", failures.len());
    }

    println!("All keystores and deposit records are valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_folder_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "keystore-m_12381_3600_1_0_0-5.json",
            "keystore-m_12381_3600_0_0_0-5.json",
            "deposit_data-5.json",
            "notes.txt",
            "keystore-backup.txt",
        ] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let contents = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = contents
            .keystores
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "keystore-m_12381_3600_0_0_0-5.json",
                "keystore-m_12381_3600_1_0_0-5.json"
            ]
        );
        assert_eq!(contents.deposit_data.len(), 1);
    }

    #[test]
    fn test_empty_folder_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_folder(dir.path(), "correcthorse").unwrap_err();
        assert!(err.to_string().contains("No keystores found"));
    }
}
