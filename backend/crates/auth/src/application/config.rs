//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! shared read-only behind an `Arc`.

use std::fmt;
use std::time::Duration;

use http::HeaderName;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (1 hour)
    pub access_ttl: Duration,
    /// Refresh token lifetime (24 hours)
    pub refresh_ttl: Duration,
    /// Session record lifetime, independent of `refresh_ttl` (24 hours)
    pub session_ttl: Duration,
    /// Session record key prefix, followed by the email
    pub session_key_prefix: String,
    /// Credential prefix in bearer headers, ends with one space
    pub bearer_prefix: String,
    /// Header carrying the refresh token
    pub refresh_header: HeaderName,
    /// Upper bound on a single session store command
    pub store_timeout: Duration,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: vec![0u8; 32],
            access_ttl: Duration::from_secs(60 * 60),
            refresh_ttl: Duration::from_secs(24 * 3600),
            session_ttl: Duration::from_secs(24 * 3600),
            session_key_prefix: "refresh:".to_string(),
            bearer_prefix: "Bearer ".to_string(),
            refresh_header: HeaderName::from_static("x-refresh-token"),
            store_timeout: Duration::from_secs(2),
            password_pepper: None,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(64),
            ..Default::default()
        }
    }

    /// Create config for development (short access tokens to exercise refresh)
    pub fn development() -> Self {
        Self {
            access_ttl: Duration::from_secs(5 * 60),
            ..Self::with_random_secret()
        }
    }

    /// Session store key for an identity
    pub fn session_key(&self, email: &str) -> String {
        format!("{}{}", self.session_key_prefix, email)
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("session_ttl", &self.session_ttl)
            .field("session_key_prefix", &self.session_key_prefix)
            .field("bearer_prefix", &self.bearer_prefix)
            .field("refresh_header", &self.refresh_header)
            .field("store_timeout", &self.store_timeout)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl, Duration::from_secs(3600));
        assert_eq!(config.refresh_ttl, Duration::from_secs(86400));
        assert!(config.access_ttl < config.refresh_ttl);
        assert_eq!(config.bearer_prefix, "Bearer ");
        assert_eq!(config.refresh_header.as_str(), "x-refresh-token");
    }

    #[test]
    fn test_session_key() {
        let config = AuthConfig::default();
        assert_eq!(config.session_key("buyer@example.com"), "refresh:buyer@example.com");
    }

    #[test]
    fn test_random_secrets_differ() {
        let a = AuthConfig::with_random_secret();
        let b = AuthConfig::with_random_secret();
        assert_eq!(a.jwt_secret.len(), 64);
        assert_ne!(a.jwt_secret, b.jwt_secret);
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = AuthConfig {
            jwt_secret: b"super-secret-signing-key".to_vec(),
            password_pepper: Some(b"pepper".to_vec()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("112, 101"));
    }
}
