//! Terminal interaction: passwords, seed phrases and the confirmation loop
//!
//! Secrets read here live in `Zeroizing<String>` so they are wiped when the
//! command finishes.

use anyhow::{anyhow, bail, Context, Result};
use deposit_crypto::{Language, Mnemonic};
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use zeroize::Zeroizing;

/// Minimum keystore password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Read a secret from a file, dropping the trailing line break
pub fn read_secret_file(path: &Path, what: &str) -> Result<Zeroizing<String>> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read {} file: {}", what, path.display()))?,
    );
    Ok(Zeroizing::new(
        content.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

/// Check the keystore password length
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        bail!(
            "The password length should be at least {} characters",
            MIN_PASSWORD_LENGTH
        );
    }
    Ok(())
}

/// Read the keystore password from file or prompt for it twice
pub fn get_password(password_file: Option<&Path>) -> Result<Zeroizing<String>> {
    let password = match password_file {
        Some(file) => read_secret_file(file, "password")?,
        None => prompt_password()?,
    };
    validate_password_strength(&password)?;
    Ok(password)
}

fn prompt_password() -> Result<Zeroizing<String>> {
    loop {
        let password = Zeroizing::new(
            rpassword::prompt_password(
                "Create a password that secures your validator keystore(s): ",
            )
            .context("Failed to read password")?,
        );

        if let Err(e) = validate_password_strength(&password) {
            eprintln!("{e}");
            continue;
        }

        let confirmation = Zeroizing::new(
            rpassword::prompt_password("Repeat your keystore password for confirmation: ")
                .context("Failed to read password confirmation")?,
        );
        if *password == *confirmation {
            return Ok(password);
        }
        eprintln!("Error: the two entered values do not match. Please type again.");
    }
}

/// Read the optional BIP-39 passphrase; empty when no file is given
pub fn get_mnemonic_password(path: Option<&Path>) -> Result<Zeroizing<String>> {
    match path {
        Some(file) => read_secret_file(file, "mnemonic password"),
        None => Ok(Zeroizing::new(String::new())),
    }
}

/// Read an existing seed phrase from file or from the terminal
///
/// A phrase from a file gets one attempt; at the terminal the user is asked
/// again until the phrase parses.
pub fn get_mnemonic(mnemonic_file: Option<&Path>, language: Language) -> Result<Mnemonic> {
    if let Some(file) = mnemonic_file {
        let phrase = read_secret_file(file, "mnemonic")?;
        return Mnemonic::from_phrase(&phrase, language).context("Invalid mnemonic");
    }

    let stdin = io::stdin();
    read_mnemonic_from(&mut stdin.lock(), &mut io::stdout(), language)
}

/// Prompt on `output` and parse phrases from `input` until one is valid
pub fn read_mnemonic_from<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    language: Language,
) -> Result<Mnemonic> {
    loop {
        write!(output, "Please enter your mnemonic separated by spaces (\" \"): ")?;
        output.flush()?;

        let line = read_line(input)?;
        match Mnemonic::from_phrase(&line, language) {
            Ok(mnemonic) => return Ok(mnemonic),
            Err(e) if e.is_phrase_error() => writeln!(output, "{e}. Please try again.")?,
            Err(e) => return Err(e).context("Invalid mnemonic"),
        }
    }
}

/// Show a freshly generated phrase with the safekeeping warning
pub fn display_mnemonic_warning<W: Write>(output: &mut W, mnemonic: &Mnemonic) -> Result<()> {
    writeln!(output)?;
    writeln!(output, "============================================================")?;
    writeln!(output, "  This is your mnemonic (seed phrase). Write it down and")?;
    writeln!(output, "  store it safely. It is the ONLY way to retrieve your deposit.")?;
    writeln!(output, "============================================================")?;
    writeln!(output)?;

    let words: Vec<&str> = mnemonic.phrase().split_whitespace().collect();
    for (i, chunk) in words.chunks(4).enumerate() {
        let start_num = i * 4 + 1;
        let formatted: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(j, word)| format!("{:2}. {:<12}", start_num + j, word))
            .collect();
        writeln!(output, "  {}", formatted.join("  "))?;
    }

    writeln!(output)?;
    output.flush()?;
    Ok(())
}

/// Ask the user to retype the phrase until it matches
pub fn confirm_mnemonic<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mnemonic: &Mnemonic,
) -> Result<()> {
    write!(output, "Press any key when you have written down your mnemonic.")?;
    output.flush()?;
    read_line(input)?;
    clear_screen(output)?;

    loop {
        write!(
            output,
            "Please type your mnemonic (separated by spaces) to confirm you have written it down: "
        )?;
        output.flush()?;

        let typed = read_line(input)?;
        if mnemonic.matches(&typed) {
            return Ok(());
        }
        writeln!(output, "The mnemonic does not match. Please try again.")?;
    }
}

fn clear_screen<W: Write>(output: &mut W) -> Result<()> {
    write!(output, "\x1B[2J\x1B[1;1H")?;
    output.flush()?;
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    if input.read_line(&mut line)? == 0 {
        return Err(anyhow!("Unexpected end of input"));
    }
    Ok(Zeroizing::new(line.trim().to_string()))
}
