//! Validator deposit CLI
//!
//! Generates EIP-2335 keystores and deposit data for proof-of-stake
//! validators from a new or an existing seed phrase.

mod config;
mod generate;
mod prompt;
mod settings;
mod verify;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use deposit_crypto::{Language, Mnemonic};
use std::io;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use config::DepositConfig;
use generate::{generate_keys, print_success, GenerateOptions, DEFAULT_VALIDATOR_KEYS_FOLDER_NAME};

/// Environment variable overriding the default home directory
const DEPOSIT_HOME_ENV: &str = "DEPOSIT_HOME";

/// Home directory name under the user's home
const DEFAULT_HOME_DIR: &str = ".deposit";

/// Validator deposit tool
#[derive(Parser)]
#[command(name = "deposit")]
#[command(version)]
#[command(about = "Generate validator keystores and deposit data", long_about = None)]
#[command(propagate_version = true)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Directory holding deposit.toml
    #[arg(long, global = true, default_value_os_t = default_home_dir())]
    home: PathBuf,

    /// Path to configuration file (overrides <home>/deposit.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// The logging level (trace|debug|info|warn|error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// The logging format (json|plain)
    #[arg(long, global = true, default_value = "plain")]
    log_format: String,

    /// Disable colored logs
    #[arg(long, global = true, default_value = "false")]
    log_no_color: bool,

    /// Print out full error chain on errors
    #[arg(long, global = true, default_value = "false")]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by both key-generation commands
#[derive(Args)]
struct KeyGenArgs {
    /// Number of validator keys to generate
    #[arg(long)]
    num_validators: u32,

    /// Chain to sign deposits for (mainnet|pyrmont|prater)
    #[arg(long)]
    chain: Option<String>,

    /// Parent directory of the validator_keys folder
    #[arg(long)]
    folder: Option<PathBuf>,

    /// Keystore key-derivation function (scrypt|pbkdf2)
    #[arg(long)]
    kdf: Option<String>,

    /// Read the keystore password from file instead of prompting
    #[arg(long)]
    password_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new seed phrase and keys derived from it
    ///
    /// The phrase is shown ONCE and must be retyped to confirm it was
    /// written down.
    NewMnemonic {
        #[command(flatten)]
        keygen: KeyGenArgs,

        /// Word list for the new phrase
        #[arg(long)]
        mnemonic_language: Option<String>,

        /// Print the phrase without asking for confirmation
        ///
        /// Requires --password-file.
        #[arg(long, default_value = "false")]
        non_interactive: bool,
    },

    /// Generate (or recover) keys from an existing seed phrase
    ExistingMnemonic {
        #[command(flatten)]
        keygen: KeyGenArgs,

        /// Language the phrase is written in
        #[arg(long)]
        mnemonic_language: Option<String>,

        /// Read the phrase from file instead of prompting
        #[arg(long)]
        mnemonic_file: Option<PathBuf>,

        /// Read the optional BIP-39 passphrase from file
        #[arg(long)]
        mnemonic_password_file: Option<PathBuf>,

        /// Index of the first validator key to derive
        ///
        /// Use this to add validators to keys generated before from the
        /// same phrase.
        #[arg(long, default_value = "0")]
        validator_start_index: u32,
    },

    /// Verify the keystores and deposit data in a validator_keys folder
    Verify {
        /// Parent directory of the validator_keys folder
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Read the keystore password from file instead of prompting
        #[arg(long)]
        password_file: Option<PathBuf>,
    },
}

/// Returns the default home directory.
///
/// Resolution order:
/// 1. `DEPOSIT_HOME` environment variable (if set)
/// 2. `~/.deposit` (default)
fn default_home_dir() -> PathBuf {
    if let Ok(home) = std::env::var(DEPOSIT_HOME_ENV) {
        return PathBuf::from(home);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_HOME_DIR)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(&cli.log_level, &cli.log_format, cli.log_no_color);

    let result = DepositConfig::load(&cli.home, cli.config.as_deref()).and_then(|config| {
        match cli.command {
            Commands::NewMnemonic {
                keygen,
                mnemonic_language,
                non_interactive,
            } => cmd_new_mnemonic(
                &config,
                &keygen,
                mnemonic_language.as_deref(),
                non_interactive,
            ),

            Commands::ExistingMnemonic {
                keygen,
                mnemonic_language,
                mnemonic_file,
                mnemonic_password_file,
                validator_start_index,
            } => cmd_existing_mnemonic(
                &config,
                &keygen,
                mnemonic_language.as_deref(),
                mnemonic_file.as_deref(),
                mnemonic_password_file.as_deref(),
                validator_start_index,
            ),

            Commands::Verify {
                folder,
                password_file,
            } => cmd_verify(&config, folder, password_file.as_deref()),
        }
    });

    if let Err(e) = &result {
        if cli.trace {
            eprintln!("Error: {:?}", e);
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(log_level: &str, log_format: &str, no_color: bool) {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(!no_color);

    match log_format {
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

fn run_generation(
    config: &DepositConfig,
    keygen: &KeyGenArgs,
    mnemonic: &Mnemonic,
    mnemonic_password: &str,
    start_index: u32,
    password: &str,
) -> Result<()> {
    let chain = config.resolve_chain(keygen.chain.as_deref())?;
    let kdf = config.resolve_kdf(keygen.kdf.as_deref())?;
    let folder = config.resolve_folder(keygen.folder.clone());

    let artifacts = generate_keys(&GenerateOptions {
        mnemonic,
        mnemonic_password,
        start_index,
        num_validators: keygen.num_validators,
        chain,
        folder: &folder,
        kdf,
        password,
    })?;

    print_success(&artifacts);
    Ok(())
}

fn cmd_new_mnemonic(
    config: &DepositConfig,
    keygen: &KeyGenArgs,
    language: Option<&str>,
    non_interactive: bool,
) -> Result<()> {
    if non_interactive && keygen.password_file.is_none() {
        bail!("--password-file is required with --non-interactive");
    }

    // Fail on bad settings before a phrase is shown
    let language: Language = config.resolve_language(language)?;
    config.resolve_chain(keygen.chain.as_deref())?;
    config.resolve_kdf(keygen.kdf.as_deref())?;

    let password = prompt::get_password(keygen.password_file.as_deref())?;
    let mnemonic = Mnemonic::generate(language)?;

    let mut stdout = io::stdout();
    prompt::display_mnemonic_warning(&mut stdout, &mnemonic)?;
    if !non_interactive {
        prompt::confirm_mnemonic(&mut io::stdin().lock(), &mut stdout, &mnemonic)?;
    }

    run_generation(config, keygen, &mnemonic, "", 0, &password)
}

fn cmd_existing_mnemonic(
    config: &DepositConfig,
    keygen: &KeyGenArgs,
    language: Option<&str>,
    mnemonic_file: Option<&Path>,
    mnemonic_password_file: Option<&Path>,
    start_index: u32,
) -> Result<()> {
    let language = config.resolve_language(language)?;
    let mnemonic = prompt::get_mnemonic(mnemonic_file, language)?;
    let mnemonic_password = prompt::get_mnemonic_password(mnemonic_password_file)?;
    let password = prompt::get_password(keygen.password_file.as_deref())?;

    run_generation(
        config,
        keygen,
        &mnemonic,
        &mnemonic_password,
        start_index,
        &password,
    )
}

fn cmd_verify(
    config: &DepositConfig,
    folder: Option<PathBuf>,
    password_file: Option<&Path>,
) -> Result<()> {
    let folder = config
        .resolve_folder(folder)
        .join(DEFAULT_VALIDATOR_KEYS_FOLDER_NAME);
    let password = match password_file {
        Some(file) => prompt::read_secret_file(file, "password")?,
        None => zeroize::Zeroizing::new(rpassword::prompt_password(
            "Enter the password that secures your validator keystore(s): ",
        )?),
    };

    verify::verify_folder(&folder, &password)
}
