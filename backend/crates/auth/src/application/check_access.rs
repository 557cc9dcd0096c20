//! Check Access Use Case
//!
//! Stateless validation of an access token. Never touches the session store.

use std::sync::Arc;

use crate::application::token_codec::TokenCodec;
use crate::domain::entity::account::AuthenticatedAccount;
use crate::domain::token::TokenKind;
use crate::error::{AuthError, AuthResult};

pub struct CheckAccessUseCase {
    codec: Arc<TokenCodec>,
}

impl CheckAccessUseCase {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    pub fn execute(&self, access_token: &str) -> AuthResult<AuthenticatedAccount> {
        let claims = self
            .codec
            .validate(access_token, TokenKind::Access)
            .map_err(AuthError::InvalidAccessToken)?;

        let account_id = claims.account_id().map_err(AuthError::InvalidAccessToken)?;

        Ok(AuthenticatedAccount {
            account_id,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use kernel::id::AccountId;

    use super::*;
    use crate::application::config::AuthConfig;
    use crate::domain::token::TokenError;

    fn codec() -> Arc<TokenCodec> {
        Arc::new(TokenCodec::new(&AuthConfig::with_random_secret()))
    }

    #[test]
    fn test_valid_access_token() {
        let codec = codec();
        let pair = codec.issue_pair(AccountId::new(3), "seller@example.com").unwrap();

        let account = CheckAccessUseCase::new(codec)
            .execute(&pair.access_token)
            .unwrap();
        assert_eq!(
            account,
            AuthenticatedAccount {
                account_id: AccountId::new(3),
                email: "seller@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_refresh_token_is_not_access() {
        let codec = codec();
        let pair = codec.issue_pair(AccountId::new(3), "seller@example.com").unwrap();

        let err = CheckAccessUseCase::new(codec)
            .execute(&pair.refresh_token)
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidAccessToken(TokenError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_expired_access_token() {
        let codec = codec();
        let issued = codec
            .issue_at(AccountId::new(3), "seller@example.com", TokenKind::Access, 1_000)
            .unwrap();

        let err = CheckAccessUseCase::new(codec)
            .execute(&issued.token)
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidAccessToken(TokenError::Expired)
        ));
    }
}
