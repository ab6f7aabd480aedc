//! Token derivation.
//!
//! A token is `base64url(digest(salt + "-" + secret))`. Nothing but the salt
//! is persisted; holding the current salt and the secret is enough to
//! recompute the token.

use crate::error::CsrfError;
use base64::{Engine, engine::general_purpose::URL_SAFE};
use rand::{Rng, distributions::Alphanumeric};
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Length of generated salts, in alphanumeric characters.
pub const SALT_LEN: usize = 32;

/// Digest used to derive tokens from a salt and the secret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TokenDigest {
    /// SHA-1, compatible with tokens minted by existing deployments.
    #[default]
    Sha1,
    Sha256,
}

impl TokenDigest {
    /// Derive the token for `salt` under `secret`.
    pub fn tokenize(self, secret: &str, salt: &str) -> String {
        let input = format!("{salt}-{secret}");
        match self {
            TokenDigest::Sha1 => URL_SAFE.encode(Sha1::digest(input.as_bytes())),
            TokenDigest::Sha256 => URL_SAFE.encode(Sha256::digest(input.as_bytes())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenDigest::Sha1 => "sha1",
            TokenDigest::Sha256 => "sha256",
        }
    }
}

impl FromStr for TokenDigest {
    type Err = CsrfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Ok(TokenDigest::Sha1),
            "sha256" | "sha-256" => Ok(TokenDigest::Sha256),
            other => Err(CsrfError::Config(format!("unknown token digest '{other}'"))),
        }
    }
}

/// Derive a token with the default digest.
pub fn tokenize(secret: &str, salt: &str) -> String {
    TokenDigest::default().tokenize(secret, salt)
}

/// Generate a fresh random salt.
pub fn generate_salt() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect()
}

/// Compare an expected token with a presented one in constant time.
///
/// Tokens of different lengths never match.
pub fn tokens_match(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}
