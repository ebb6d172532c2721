//! Secret containers built on `secrecy` and `zeroize`

use secrecy::{SecretBox, SecretString as SecrecySecretString};
use zeroize::Zeroize;

/// Heap secret of variable length: KDF output and decrypted keystore bytes.
///
/// ```rust
/// use deposit_crypto::secure::SecretBytes;
/// use secrecy::ExposeSecret;
///
/// let dk = SecretBytes::new(Box::new(vec![7u8; 32]));
/// assert_eq!(dk.expose_secret().len(), 32);
/// ```
pub type SecretBytes = SecretBox<Vec<u8>>;

/// Seed phrases and normalized keystore passwords.
pub type SecretString = SecrecySecretString;

/// Fixed-size secret: seeds, entropy and key-tree nodes.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SecretArray<const N: usize> {
    inner: [u8; N],
}

impl<const N: usize> SecretArray<N> {
    /// Wrap bytes the caller no longer holds.
    pub fn new(bytes: [u8; N]) -> Self {
        Self { inner: bytes }
    }

    /// Copy `bytes` in and wipe the caller's buffer.
    pub fn take(bytes: &mut [u8; N]) -> Self {
        let secret = Self { inner: *bytes };
        bytes.zeroize();
        secret
    }

    pub fn expose_secret(&self) -> &[u8; N] {
        &self.inner
    }
}

impl<const N: usize> std::fmt::Debug for SecretArray<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecretArray<{}>([REDACTED])", N)
    }
}
