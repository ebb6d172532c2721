//! Secure memory handling for cryptographic material
//!
//! Containers for phrases, seeds, derived keys and decrypted key bytes:
//! - Automatic zeroing on drop via `zeroize`
//! - Debug output masking to prevent log exposure
//! - No `Clone`, so copies of secrets are always explicit

mod secret;

pub use secret::{SecretArray, SecretBytes, SecretString};
