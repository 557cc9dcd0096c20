//! Refresh Use Case
//!
//! Exchanges the current refresh token for a new pair and makes the new
//! refresh token the identity's only valid one.
//!
//! Two clients refreshing with the same token race: the loser sees
//! `SessionMismatch`, the same outcome as replaying a rotated token.

use std::sync::Arc;

use platform::crypto::{constant_time_eq, fingerprint};

use crate::application::config::AuthConfig;
use crate::application::token_codec::{TokenCodec, TokenPair};
use crate::domain::repository::SessionStore;
use crate::domain::token::TokenKind;
use crate::error::{AuthError, AuthResult};

/// Refresh input
pub struct RefreshInput {
    /// Access token, if the client sent one
    pub access_token: Option<String>,
    /// Only required once the access token no longer passes
    pub refresh_token: Option<String>,
}

/// Refresh outcome
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// Presented access token is still valid; nothing was read or written
    StillValid,
    /// New pair, already recorded as the current session
    Rotated(TokenPair),
}

/// Refresh use case
pub struct RefreshUseCase<S>
where
    S: SessionStore,
{
    sessions: Arc<S>,
    codec: Arc<TokenCodec>,
    config: Arc<AuthConfig>,
}

impl<S> RefreshUseCase<S>
where
    S: SessionStore,
{
    pub fn new(sessions: Arc<S>, codec: Arc<TokenCodec>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions,
            codec,
            config,
        }
    }

    pub async fn execute(&self, input: RefreshInput) -> AuthResult<RefreshOutcome> {
        if let Some(access_token) = input.access_token.as_deref() {
            if self.codec.validate(access_token, TokenKind::Access).is_ok() {
                tracing::debug!("Access token still valid, refresh skipped");
                return Ok(RefreshOutcome::StillValid);
            }
        }

        let refresh_token = input.refresh_token.ok_or(AuthError::MissingRefreshToken)?;
        let claims = self
            .codec
            .validate(&refresh_token, TokenKind::Refresh)
            .map_err(AuthError::InvalidRefresh)?;
        let account_id = claims.account_id().map_err(AuthError::InvalidRefresh)?;

        let key = self.config.session_key(&claims.email);
        let current = self
            .sessions
            .get(&key)
            .await?
            .ok_or(AuthError::SessionNotFound)?;

        if !constant_time_eq(current.as_bytes(), refresh_token.as_bytes()) {
            tracing::warn!(
                account_id = %account_id,
                presented = %fingerprint(&refresh_token),
                "Stale or replayed refresh token"
            );
            return Err(AuthError::SessionMismatch);
        }

        // The pair is only handed out once the store has accepted it
        let tokens = self.codec.issue_pair(account_id, &claims.email)?;
        self.sessions.put(&key, &tokens.refresh_token).await?;

        tracing::info!(
            account_id = %account_id,
            refresh = %fingerprint(&tokens.refresh_token),
            "Session rotated"
        );

        Ok(RefreshOutcome::Rotated(tokens))
    }
}

#[cfg(test)]
mod tests {
    use kernel::id::AccountId;

    use super::*;
    use crate::domain::token::TokenError;
    use crate::infra::memory::InMemorySessionStore;

    const KEY: &str = "refresh:buyer@example.com";

    struct Fixture {
        sessions: InMemorySessionStore,
        codec: Arc<TokenCodec>,
        refresh: RefreshUseCase<InMemorySessionStore>,
    }

    fn fixture() -> Fixture {
        let config = Arc::new(AuthConfig::with_random_secret());
        let sessions = InMemorySessionStore::new(config.session_ttl);
        let codec = Arc::new(TokenCodec::new(&config));

        Fixture {
            sessions: sessions.clone(),
            codec: codec.clone(),
            refresh: RefreshUseCase::new(Arc::new(sessions), codec, config),
        }
    }

    impl Fixture {
        /// What a successful login leaves behind
        async fn logged_in(&self) -> TokenPair {
            let pair = self
                .codec
                .issue_pair(AccountId::new(1), "buyer@example.com")
                .unwrap();
            self.sessions.put(KEY, &pair.refresh_token).await.unwrap();
            pair
        }

        async fn rotate(&self, refresh_token: &str) -> AuthResult<RefreshOutcome> {
            self.refresh
                .execute(RefreshInput {
                    access_token: None,
                    refresh_token: Some(refresh_token.to_string()),
                })
                .await
        }
    }

    fn expect_rotated(outcome: RefreshOutcome) -> TokenPair {
        match outcome {
            RefreshOutcome::Rotated(pair) => pair,
            RefreshOutcome::StillValid => panic!("expected a rotated pair"),
        }
    }

    #[tokio::test]
    async fn test_rotation_replaces_session() {
        let f = fixture();
        let r1 = f.logged_in().await.refresh_token;

        let pair = expect_rotated(f.rotate(&r1).await.unwrap());

        assert_ne!(pair.refresh_token, r1);
        assert_eq!(f.sessions.get(KEY).await.unwrap(), Some(pair.refresh_token.clone()));
        assert!(f.codec.validate(&pair.access_token, TokenKind::Access).is_ok());
    }

    #[tokio::test]
    async fn test_predecessor_is_rejected_after_rotation() {
        let f = fixture();
        let r1 = f.logged_in().await.refresh_token;
        let r2 = expect_rotated(f.rotate(&r1).await.unwrap()).refresh_token;

        let err = f.rotate(&r1).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionMismatch));

        // The replay did not disturb the current session
        assert_eq!(f.sessions.get(KEY).await.unwrap(), Some(r2.clone()));
        assert!(f.rotate(&r2).await.is_ok());
    }

    #[tokio::test]
    async fn test_valid_access_short_circuits() {
        let f = fixture();
        let pair = f.logged_in().await;
        let writes = f.sessions.write_count();
        let ttl_before = f.sessions.remaining_ttl(KEY).await.unwrap();

        let outcome = f
            .refresh
            .execute(RefreshInput {
                access_token: Some(pair.access_token),
                refresh_token: Some(pair.refresh_token.clone()),
            })
            .await
            .unwrap();

        assert!(matches!(outcome, RefreshOutcome::StillValid));
        assert_eq!(f.sessions.write_count(), writes);
        assert!(f.sessions.remaining_ttl(KEY).await.unwrap() <= ttl_before);
        assert_eq!(f.sessions.get(KEY).await.unwrap(), Some(pair.refresh_token));
    }

    #[tokio::test]
    async fn test_valid_access_needs_no_refresh_token() {
        let f = fixture();
        let pair = f.logged_in().await;

        let outcome = f
            .refresh
            .execute(RefreshInput {
                access_token: Some(pair.access_token),
                refresh_token: None,
            })
            .await
            .unwrap();
        assert!(matches!(outcome, RefreshOutcome::StillValid));

        let err = f
            .refresh
            .execute(RefreshInput {
                access_token: Some("garbage".to_string()),
                refresh_token: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingRefreshToken));
    }

    #[tokio::test]
    async fn test_invalid_access_falls_through_to_rotation() {
        let f = fixture();
        let pair = f.logged_in().await;

        let outcome = f
            .refresh
            .execute(RefreshInput {
                access_token: Some("garbage".to_string()),
                refresh_token: Some(pair.refresh_token),
            })
            .await
            .unwrap();
        assert!(matches!(outcome, RefreshOutcome::Rotated(_)));
    }

    #[tokio::test]
    async fn test_access_token_is_not_a_refresh_token() {
        let f = fixture();
        let pair = f.logged_in().await;

        let err = f.rotate(&pair.access_token).await.unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidRefresh(TokenError::KindMismatch { .. })
        ));
    }

    #[tokio::test]
    async fn test_expired_refresh_token() {
        let f = fixture();
        let stale = f
            .codec
            .issue_at(AccountId::new(1), "buyer@example.com", TokenKind::Refresh, 1_000)
            .unwrap();
        f.sessions.put(KEY, &stale.token).await.unwrap();

        let err = f.rotate(&stale.token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRefresh(TokenError::Expired)));
    }

    #[tokio::test]
    async fn test_unreachable_store() {
        let f = fixture();
        let r1 = f.logged_in().await.refresh_token;
        f.sessions.set_unavailable(true);

        let err = f.rotate(&r1).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_session() {
        let f = fixture();
        let pair = f
            .codec
            .issue_pair(AccountId::new(1), "buyer@example.com")
            .unwrap();

        let err = f.rotate(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AuthError::SessionNotFound));
        assert_eq!(f.sessions.write_count(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_discards_new_pair() {
        let f = fixture();
        let r1 = f.logged_in().await.refresh_token;
        f.sessions.set_writes_failing(true);

        let err = f.rotate(&r1).await.unwrap_err();
        assert!(matches!(err, AuthError::StoreUnavailable(_)));

        // Once the store recovers the old token is still the current one
        f.sessions.set_writes_failing(false);
        assert_eq!(f.sessions.get(KEY).await.unwrap(), Some(r1.clone()));
        assert!(f.rotate(&r1).await.is_ok());
    }
}
