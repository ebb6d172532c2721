//! Key Derivation Function (KDF) implementation
//!
//! Supports the two EIP-2335 functions: scrypt (default) and
//! PBKDF2-HMAC-SHA256. Parameters are stored in the keystore and validated
//! before any derivation runs.

use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::error::{KeystoreError, KeystoreResult};
use crate::secure::SecretBytes;

/// Standard scrypt parameters following EIP-2335 specification
pub const SCRYPT_N: u32 = 262144; // 2^18
pub const SCRYPT_R: u32 = 8;
pub const SCRYPT_P: u32 = 1;

/// Standard PBKDF2 iteration count
pub const PBKDF2_C: u32 = 262144;

/// Derived key length in bytes
pub const DKLEN: u32 = 32;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 32;

const SCRYPT_FUNCTION: &str = "scrypt";
const PBKDF2_FUNCTION: &str = "pbkdf2";
const PBKDF2_PRF: &str = "hmac-sha256";

/// Work-factor choice for new keystores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdfConfig {
    Scrypt { n: u32, r: u32, p: u32 },
    Pbkdf2 { c: u32 },
}

impl KdfConfig {
    /// scrypt with n=2^18, r=8, p=1
    pub const fn scrypt() -> Self {
        Self::Scrypt {
            n: SCRYPT_N,
            r: SCRYPT_R,
            p: SCRYPT_P,
        }
    }

    /// PBKDF2-HMAC-SHA256 with c=2^18
    pub const fn pbkdf2() -> Self {
        Self::Pbkdf2 { c: PBKDF2_C }
    }

    /// Function name as written into the keystore
    pub fn function(&self) -> &'static str {
        match self {
            Self::Scrypt { .. } => SCRYPT_FUNCTION,
            Self::Pbkdf2 { .. } => PBKDF2_FUNCTION,
        }
    }

    /// Build the keystore module for this configuration and a salt
    pub fn module(&self, salt: &[u8]) -> KdfModule {
        let salt = hex::encode(salt);
        let params = match *self {
            Self::Scrypt { n, r, p } => KdfParams::Scrypt {
                dklen: DKLEN,
                n,
                r,
                p,
                salt,
            },
            Self::Pbkdf2 { c } => KdfParams::Pbkdf2 {
                dklen: DKLEN,
                c,
                prf: PBKDF2_PRF.to_string(),
                salt,
            },
        };
        KdfModule {
            function: self.function().to_string(),
            params,
            message: String::new(),
        }
    }
}

impl Default for KdfConfig {
    fn default() -> Self {
        Self::scrypt()
    }
}

impl std::str::FromStr for KdfConfig {
    type Err = KeystoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            SCRYPT_FUNCTION => Ok(Self::scrypt()),
            PBKDF2_FUNCTION => Ok(Self::pbkdf2()),
            other => Err(KeystoreError::UnsupportedFunction {
                module: "kdf",
                function: other.to_string(),
            }),
        }
    }
}

/// KDF module for EIP-2335 keystore
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KdfModule {
    /// KDF function identifier ("scrypt" or "pbkdf2")
    pub function: String,
    /// KDF parameters
    pub params: KdfParams,
    /// Empty message field (required by EIP-2335 schema)
    pub message: String,
}

impl KdfModule {
    /// Derive the decryption key from a normalized password
    ///
    /// The function name must agree with the parameter set, and the
    /// parameters must pass validation.
    pub fn derive_key(&self, password: &[u8]) -> KeystoreResult<SecretBytes> {
        self.params.validate()?;

        match (self.function.as_str(), &self.params) {
            (
                SCRYPT_FUNCTION,
                KdfParams::Scrypt {
                    dklen,
                    n,
                    r,
                    p,
                    salt,
                },
            ) => scrypt_derive_key(password, &decode_salt(salt)?, *n, *r, *p, *dklen as usize),
            (
                PBKDF2_FUNCTION,
                KdfParams::Pbkdf2 {
                    dklen, c, salt, ..
                },
            ) => Ok(pbkdf2_derive_key(
                password,
                &decode_salt(salt)?,
                *c,
                *dklen as usize,
            )),
            (function, _) => Err(KeystoreError::UnsupportedFunction {
                module: "kdf",
                function: function.to_string(),
            }),
        }
    }
}

/// KDF parameters supporting different algorithms
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum KdfParams {
    /// scrypt parameters (EIP-2335 standard)
    Scrypt {
        /// Derived key length in bytes
        dklen: u32,
        /// CPU/memory cost parameter (must be power of 2)
        n: u32,
        /// Block size parameter
        r: u32,
        /// Parallelization parameter
        p: u32,
        /// Salt as hex string
        salt: String,
    },
    /// PBKDF2 parameters
    Pbkdf2 {
        dklen: u32,
        /// Iteration count
        c: u32,
        /// Pseudo-random function, always "hmac-sha256"
        prf: String,
        salt: String,
    },
}

impl KdfParams {
    /// Validate the parameters
    pub fn validate(&self) -> KeystoreResult<()> {
        let (dklen, salt) = match self {
            KdfParams::Scrypt {
                dklen,
                n,
                r,
                p,
                salt,
            } => {
                if *n < 2 || !n.is_power_of_two() {
                    return Err(invalid("n must be a power of 2 greater than 1"));
                }
                if *r == 0 {
                    return Err(invalid("r must be positive"));
                }
                if *p == 0 {
                    return Err(invalid("p must be positive"));
                }
                (*dklen, salt)
            }
            KdfParams::Pbkdf2 {
                dklen,
                c,
                prf,
                salt,
            } => {
                if *c == 0 {
                    return Err(invalid("c must be positive"));
                }
                if prf != PBKDF2_PRF {
                    return Err(KeystoreError::UnsupportedFunction {
                        module: "prf",
                        function: prf.clone(),
                    });
                }
                (*dklen, salt)
            }
        };

        if dklen < DKLEN {
            return Err(invalid("dklen must be at least 32"));
        }
        decode_salt(salt)?;
        Ok(())
    }
}

fn invalid(reason: &str) -> KeystoreError {
    KeystoreError::InvalidKdfParams(reason.to_string())
}

fn decode_salt(salt: &str) -> KeystoreResult<Vec<u8>> {
    hex::decode(salt).map_err(|_| KeystoreError::InvalidHex("kdf salt"))
}

/// Derive a key using scrypt KDF
///
/// `n` must be a power of two; callers validate it first.
pub fn scrypt_derive_key(
    password: &[u8],
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
    dklen: usize,
) -> KeystoreResult<SecretBytes> {
    let log_n = n.trailing_zeros() as u8;

    let params = scrypt::Params::new(log_n, r, p, dklen)
        .map_err(|e| KeystoreError::InvalidKdfParams(e.to_string()))?;

    let mut output = vec![0u8; dklen];
    scrypt::scrypt(password, salt, &params, &mut output)
        .map_err(|e| KeystoreError::KdfFailure(e.to_string()))?;

    Ok(SecretBytes::new(Box::new(output)))
}

/// Derive a key using PBKDF2-HMAC-SHA256
pub fn pbkdf2_derive_key(password: &[u8], salt: &[u8], c: u32, dklen: usize) -> SecretBytes {
    let mut output = vec![0u8; dklen];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, c, &mut output);
    SecretBytes::new(Box::new(output))
}
