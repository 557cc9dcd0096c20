//! Repository Traits
//!
//! Interfaces for data persistence. Implementations are in the infrastructure layer.

use crate::domain::entity::account::{Account, NewAccount};
use crate::domain::value_object::email::Email;
use crate::error::AuthResult;

/// Relational account storage
#[trait_variant::make(AccountDirectory: Send)]
pub trait LocalAccountDirectory {
    /// Find account by normalized email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>>;

    /// Check if email is already registered
    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// Insert an account and return it with its assigned id
    ///
    /// A uniqueness violation on email is `AuthError::DuplicateIdentity`.
    async fn create(&self, account: &NewAccount) -> AuthResult<Account>;
}

/// Key-value store holding the current refresh token per identity
///
/// Entries expire after the store's configured TTL. Failures and timeouts
/// are `AuthError::StoreUnavailable`.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Overwrite the value at `key` and reset its TTL
    async fn put(&self, key: &str, refresh_token: &str) -> AuthResult<()>;

    /// Current value, `None` when absent or expired
    async fn get(&self, key: &str) -> AuthResult<Option<String>>;
}
