//! Account Entity
//!
//! A registered identity: email plus password digest.

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::domain::value_object::{email::Email, password::PasswordDigest};

/// Persisted account
#[derive(Debug, Clone)]
pub struct Account {
    /// Serial id assigned by the directory (first account is 1)
    pub id: AccountId,
    /// Unique, lower-cased
    pub email: Email,
    pub password_hash: PasswordDigest,
    pub created_at: DateTime<Utc>,
}

/// Account not yet persisted; the directory assigns id and timestamp
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: Email,
    pub password_hash: PasswordDigest,
}

/// Identity proven by a valid access token
///
/// Produced only by access-token validation. Handlers receive it through
/// their signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: String,
}
