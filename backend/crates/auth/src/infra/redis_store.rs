//! Redis Session Store
//!
//! `SET key value EX ttl` / `GET key` over a multiplexed `ConnectionManager`.
//! Every command is bounded by the configured store timeout.

use std::future::Future;
use std::time::Duration;

use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisResult};

use crate::application::config::AuthConfig;
use crate::domain::repository::SessionStore;
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct RedisSessionStore {
    conn: ConnectionManager,
    ttl: Duration,
    timeout: Duration,
}

impl RedisSessionStore {
    pub fn new(conn: ConnectionManager, config: &AuthConfig) -> Self {
        Self {
            conn,
            ttl: config.session_ttl,
            timeout: config.store_timeout,
        }
    }

    /// `EX` takes whole seconds and rejects 0
    fn ttl_secs(&self) -> u64 {
        self.ttl.as_secs().max(1)
    }

    async fn bounded<T>(
        &self,
        command: &'static str,
        key: &str,
        fut: impl Future<Output = RedisResult<T>>,
    ) -> AuthResult<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(command, key, error = %e, "Session store command failed");
                Err(AuthError::StoreUnavailable(format!("{command}: {e}")))
            }
            Err(_) => {
                tracing::warn!(command, key, timeout = ?self.timeout, "Session store command timed out");
                Err(AuthError::StoreUnavailable(format!(
                    "{command}: timed out after {:?}",
                    self.timeout
                )))
            }
        }
    }
}

impl SessionStore for RedisSessionStore {
    async fn put(&self, key: &str, refresh_token: &str) -> AuthResult<()> {
        let mut conn = self.conn.clone();
        self.bounded("SET", key, conn.set_ex::<_, _, ()>(key, refresh_token, self.ttl_secs()))
            .await
    }

    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        let mut conn = self.conn.clone();
        self.bounded("GET", key, conn.get::<_, Option<String>>(key))
            .await
    }
}
