//! Login Use Case
//!
//! Verifies credentials, issues a token pair and records the refresh token
//! as the identity's current session.

use std::sync::Arc;

use kernel::id::AccountId;
use platform::crypto::fingerprint;

use crate::application::config::AuthConfig;
use crate::application::token_codec::{TokenCodec, TokenPair};
use crate::domain::repository::{AccountDirectory, SessionStore};
use crate::domain::value_object::{email::Email, password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Login output
#[derive(Debug, Clone)]
pub struct LoginOutput {
    pub account_id: AccountId,
    pub tokens: TokenPair,
}

/// Login use case
pub struct LoginUseCase<A, S>
where
    A: AccountDirectory,
    S: SessionStore,
{
    accounts: Arc<A>,
    sessions: Arc<S>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<A, S> LoginUseCase<A, S>
where
    A: AccountDirectory,
    S: SessionStore,
{
    pub fn new(
        accounts: Arc<A>,
        sessions: Arc<S>,
        codec: Arc<TokenCodec>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            codec,
            config,
        }
    }

    /// Nothing is written to the session store unless every check passes
    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // An email that could never have registered cannot match an account
        let email = Email::new(&input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let account = self
            .accounts
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        let raw_password = RawPassword::for_login(input.password);
        if !account
            .password_hash
            .verify(&raw_password, self.config.pepper())
        {
            return Err(AuthError::InvalidCredentials);
        }

        let tokens = self.codec.issue_pair(account.id, account.email.as_str())?;

        let key = self.config.session_key(account.email.as_str());
        self.sessions.put(&key, &tokens.refresh_token).await?;

        tracing::info!(
            account_id = %account.id,
            refresh = %fingerprint(&tokens.refresh_token),
            "Account logged in"
        );

        Ok(LoginOutput {
            account_id: account.id,
            tokens,
        })
    }
}
