//! Token Codec
//!
//! Issues and validates HS256-signed access and refresh tokens. Stateless:
//! validation never consults the session store.

use std::fmt;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use kernel::id::AccountId;
use uuid::Uuid;

use crate::application::config::AuthConfig;
use crate::domain::token::{Claims, TokenError, TokenKind};

/// A signed token together with the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Access and refresh tokens issued together
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .finish()
    }
}

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `validate_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(&config.jwt_secret),
            decoding: DecodingKey::from_secret(&config.jwt_secret),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    pub fn issue(
        &self,
        account_id: AccountId,
        email: &str,
        kind: TokenKind,
    ) -> Result<IssuedToken, TokenError> {
        self.issue_at(account_id, email, kind, now())
    }

    /// Issue with `iat = now` in seconds since the Unix epoch
    pub fn issue_at(
        &self,
        account_id: AccountId,
        email: &str,
        kind: TokenKind,
        now: i64,
    ) -> Result<IssuedToken, TokenError> {
        let ttl = i64::try_from(self.ttl(kind).as_secs())
            .map_err(|_| TokenError::Signing(format!("{kind} ttl out of range")))?;

        let claims = Claims {
            sub: account_id.to_string(),
            email: email.to_string(),
            token_type: kind,
            iat: now,
            exp: now.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    pub fn issue_pair(&self, account_id: AccountId, email: &str) -> Result<TokenPair, TokenError> {
        let now = now();
        let access = self.issue_at(account_id, email, TokenKind::Access, now)?;
        let refresh = self.issue_at(account_id, email, TokenKind::Refresh, now)?;

        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }

    pub fn validate(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        self.validate_at(token, expected, now())
    }

    /// Signature, algorithm and kind must match; valid while `now < exp`
    pub fn validate_at(
        &self,
        token: &str,
        expected: TokenKind,
        now: i64,
    ) -> Result<Claims, TokenError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| TokenError::Malformed(e.to_string()))?
            .claims;

        if claims.token_type != expected {
            return Err(TokenError::KindMismatch {
                expected,
                actual: claims.token_type,
            });
        }

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}
