use std::str::FromStr;

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

use crate::error::StoreError;

/// How the `password` column is written and compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordScheme {
    /// Salted argon2id PHC string.
    #[default]
    Argon2,
    /// Stored verbatim and compared in SQL. Only for parity with legacy databases.
    Plaintext,
}

impl FromStr for PasswordScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "argon2" => Ok(Self::Argon2),
            "plaintext" => Ok(Self::Plaintext),
            other => anyhow::bail!("unknown PASSWORD_SCHEME {other:?} (expected argon2 or plaintext)"),
        }
    }
}

impl PasswordScheme {
    /// Value to persist for `plain`.
    pub fn encode(self, plain: &str) -> Result<String, StoreError> {
        match self {
            Self::Argon2 => hash_password(plain),
            Self::Plaintext => Ok(plain.to_owned()),
        }
    }

    /// Whether `plain` matches a persisted value.
    pub fn matches(self, plain: &str, stored: &str) -> bool {
        match self {
            Self::Argon2 => verify_password(plain, stored),
            Self::Plaintext => plain == stored,
        }
    }
}

pub fn hash_password(plain: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            StoreError::Hash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// A stored value that is not a PHC string never verifies.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}
