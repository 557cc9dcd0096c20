//! Identity Token Claims
//!
//! Payload carried by access and refresh tokens. Encoding and signing live
//! in `application::token_codec`.

use derive_more::Display;
use kernel::id::AccountId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which of the two token roles a token plays
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, presented on every authenticated request
    #[display("access")]
    Access,
    /// Long-lived, exchanged for a new pair
    #[display("refresh")]
    Refresh,
}

/// Signed token payload
///
/// `exp = iat + ttl(kind)`. `jti` keeps two tokens issued for the same
/// identity within one second distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id as a decimal string
    pub sub: String,
    pub email: String,
    pub token_type: TokenKind,
    /// Issued at, seconds since the Unix epoch
    pub iat: i64,
    /// Expires at, seconds since the Unix epoch
    pub exp: i64,
    pub jti: String,
}

impl Claims {
    pub fn account_id(&self) -> Result<AccountId, TokenError> {
        self.sub
            .parse()
            .map_err(|_| TokenError::Malformed(format!("subject is not an account id: {}", self.sub)))
    }

    /// A token is usable strictly before `exp`
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

/// Token codec failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Unparseable, bad signature, wrong algorithm or missing claims
    #[error("Malformed token: {0}")]
    Malformed(String),

    #[error("Expected a {expected} token but got a {actual} token")]
    KindMismatch {
        expected: TokenKind,
        actual: TokenKind,
    },

    #[error("Token has expired")]
    Expired,

    #[error("Token signing failed: {0}")]
    Signing(String),
}
