//! In-Memory Repository Implementations
//!
//! Process-local account directory and session store for tests and local
//! runs without PostgreSQL or Redis. Cloning shares the underlying data.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use kernel::id::AccountId;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::entity::account::{Account, NewAccount};
use crate::domain::repository::{AccountDirectory, SessionStore};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

// ============================================================================
// Account Directory
// ============================================================================

#[derive(Default)]
struct AccountTable {
    last_id: i64,
    by_email: HashMap<String, Account>,
}

/// Account directory backed by a `HashMap`; ids start at 1
#[derive(Clone, Default)]
pub struct InMemoryAccountDirectory {
    table: Arc<RwLock<AccountTable>>,
}

impl InMemoryAccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.by_email.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl AccountDirectory for InMemoryAccountDirectory {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        Ok(self.table.read().await.by_email.get(email.as_str()).cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.table.read().await.by_email.contains_key(email.as_str()))
    }

    async fn create(&self, account: &NewAccount) -> AuthResult<Account> {
        let mut table = self.table.write().await;
        if table.by_email.contains_key(account.email.as_str()) {
            return Err(AuthError::DuplicateIdentity);
        }

        table.last_id += 1;
        let created = Account {
            id: AccountId::new(table.last_id),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            created_at: Utc::now(),
        };
        table
            .by_email
            .insert(created.email.as_str().to_string(), created.clone());

        Ok(created)
    }
}

// ============================================================================
// Session Store
// ============================================================================

struct Entry {
    value: String,
    expires_at: Instant,
}

/// Session store with per-entry deadlines
///
/// Counts successful writes and can simulate an outage, so callers can
/// assert on what reached the store.
#[derive(Clone)]
pub struct InMemorySessionStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
    writes: Arc<AtomicUsize>,
    reads_failing: Arc<AtomicBool>,
    writes_failing: Arc<AtomicBool>,
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::default(),
            ttl,
            writes: Arc::default(),
            reads_failing: Arc::default(),
            writes_failing: Arc::default(),
        }
    }

    /// Number of successful `put` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Fail every command, like an unreachable server
    pub fn set_unavailable(&self, unavailable: bool) {
        self.reads_failing.store(unavailable, Ordering::SeqCst);
        self.writes_failing.store(unavailable, Ordering::SeqCst);
    }

    /// Fail only `put`
    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// Time left before `key` expires, `None` when absent or expired
    pub async fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.expires_at - now)
    }

    fn check(flag: &AtomicBool, op: &str) -> AuthResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(AuthError::StoreUnavailable(format!(
                "in-memory store refused {op}"
            )));
        }
        Ok(())
    }
}

impl SessionStore for InMemorySessionStore {
    async fn put(&self, key: &str, refresh_token: &str) -> AuthResult<()> {
        Self::check(&self.writes_failing, "SET")?;

        let entry = Entry {
            value: refresh_token.to_string(),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
        self.writes.fetch_add(1, Ordering::SeqCst);

        Ok(())
    }

    async fn get(&self, key: &str) -> AuthResult<Option<String>> {
        Self::check(&self.reads_failing, "GET")?;

        let now = Instant::now();
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }
}
