//! Password Value Objects
//!
//! Domain wrappers around `platform::password`:
//! - [`RawPassword`] is the submitted secret, zeroized on drop
//! - [`PasswordDigest`] is the Argon2id PHC string the directory stores
//!
//! ```rust
//! use auth::domain::value_object::password::{PasswordDigest, RawPassword};
//!
//! let raw = RawPassword::new("MySecurePass123!".to_string()).unwrap();
//! let digest = PasswordDigest::from_raw(&raw, None).unwrap();
//! assert!(digest.verify(&raw, None));
//! ```

use std::fmt;

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::{AuthError, AuthResult};

/// Submitted secret
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Secret chosen at sign-up; must satisfy the password policy
    pub fn new(raw: String) -> AuthResult<Self> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    /// Secret presented at login
    ///
    /// Skips the policy: a secret that could never have been registered
    /// simply fails verification.
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::unchecked(raw))
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored password digest
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(HashedPassword);

impl PasswordDigest {
    /// Hash with a fresh salt
    pub fn from_raw(raw: &RawPassword, pepper: Option<&[u8]>) -> AuthResult<Self> {
        raw.0
            .hash(pepper)
            .map(Self)
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Parse a digest read from the account table
    pub fn from_phc_string(phc: impl Into<String>) -> AuthResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|e| AuthError::Internal(format!("Stored password digest: {}", e)))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// `false` on mismatch; never errors
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(&raw.0, pepper)
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use platform::password::PasswordPolicyError;

    use super::*;

    #[test]
    fn test_policy_violation_is_password_validation() {
        let err = RawPassword::new("short".to_string()).unwrap_err();
        assert!(matches!(
            err,
            AuthError::PasswordValidation(PasswordPolicyError::TooShort { .. })
        ));
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_hash_and_verify() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let digest = PasswordDigest::from_raw(&raw, None).unwrap();

        assert!(digest.verify(&raw, None));
        assert!(!digest.verify(&RawPassword::for_login("WrongPassword123!".into()), None));
    }

    #[test]
    fn test_login_secret_skips_policy() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let digest = PasswordDigest::from_raw(&raw, Some(b"pepper")).unwrap();

        // Would violate the policy, still only a mismatch
        assert!(!digest.verify(&RawPassword::for_login("x".into()), Some(b"pepper")));
        assert!(digest.verify(&RawPassword::for_login("TestPassword123!".into()), Some(b"pepper")));
    }

    #[test]
    fn test_restore_from_storage() {
        let raw = RawPassword::new("TestPassword123!".to_string()).unwrap();
        let stored = PasswordDigest::from_raw(&raw, None)
            .unwrap()
            .as_phc_string()
            .to_string();

        assert!(PasswordDigest::from_phc_string(stored).unwrap().verify(&raw, None));
        assert!(matches!(
            PasswordDigest::from_phc_string("plaintext"),
            Err(AuthError::Internal(_))
        ));
    }

    #[test]
    fn test_debug_redaction() {
        let raw = RawPassword::new("SecretPassword123!".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("Secret"));

        let digest = PasswordDigest::from_raw(&raw, None).unwrap();
        assert!(!format!("{:?}", digest).contains("argon2"));
    }
}
