//! Salted password hashing and verification.
//!
//! Modern credentials look like `sha256$<salt>$<hex digest>` where the digest
//! is `SHA-256(salt + password + salt)`. Anything without the `sha256$` prefix
//! is a legacy crypt(3) hash, which this module can check through a
//! [`LegacyCrypt`] capability but never produces.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::UsersError;

const ALGORITHM: &str = "sha256";
const SEPARATOR: char = '$';

/// Checks a password against a legacy platform crypt(3) hash.
///
/// Implementations derive the salt from the first two characters of `stored`
/// and compare `crypt(candidate, salt)` against it. Environments without the
/// primitive return [`UsersError::LegacyHashUnsupported`].
pub trait LegacyCrypt: Send + Sync {
    fn check(&self, candidate: &str, stored: &str) -> Result<bool, UsersError>;
}

/// Legacy capability for platforms with no crypt(3).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLegacyCrypt;

impl LegacyCrypt for NoLegacyCrypt {
    fn check(&self, _candidate: &str, _stored: &str) -> Result<bool, UsersError> {
        Err(UsersError::LegacyHashUnsupported)
    }
}

/// A stored password credential.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CryptedPassword(String);

impl CryptedPassword {
    /// Hash `password`, generating a fresh salt unless one is given.
    ///
    /// With an explicit salt the result is deterministic.
    pub fn new(password: &str, salt: Option<&str>) -> Self {
        let salt = match salt {
            Some(s) => s.to_string(),
            None => generate_salt(),
        };
        let digest = calculate_digest(password, &salt);
        Self(format!("{ALGORITHM}{SEPARATOR}{salt}{SEPARATOR}{digest}"))
    }

    /// Wrap an already-encoded credential, modern or legacy.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_legacy(&self) -> bool {
        self.modern_parts().is_none()
    }

    /// Verify `candidate` against this credential.
    ///
    /// Legacy credentials go through `legacy`; its failure is returned as-is.
    pub fn check(&self, candidate: &str, legacy: &dyn LegacyCrypt) -> Result<bool, UsersError> {
        let Some((salt, stored_digest)) = self.modern_parts() else {
            debug!("checking legacy crypt credential");
            return legacy.check(candidate, &self.0);
        };

        let digest = calculate_digest(candidate, salt);
        Ok(constant_time_eq(digest.as_bytes(), stored_digest.as_bytes()))
    }

    /// `(salt, digest)` for a modern credential. A missing digest segment
    /// yields an empty digest, which never matches.
    fn modern_parts(&self) -> Option<(&str, &str)> {
        let rest = self
            .0
            .strip_prefix(ALGORITHM)
            .and_then(|r| r.strip_prefix(SEPARATOR))?;
        Some(rest.split_once(SEPARATOR).unwrap_or((rest, "")))
    }
}

impl fmt::Debug for CryptedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_legacy() { "legacy" } else { ALGORITHM };
        write!(f, "CryptedPassword({kind}, <redacted>)")
    }
}

/// Compare two secrets without revealing which byte differs.
///
/// Inputs of different lengths are rejected up front, so length is not
/// hidden. Equal-length inputs are always scanned in full.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut acc = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        acc |= x ^ y;
    }
    acc == 0
}

/// Fresh 8-hex-digit salt from the thread-local CSPRNG.
fn generate_salt() -> String {
    format!("{:08x}", rand::random::<u32>())
}

fn calculate_digest(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}
