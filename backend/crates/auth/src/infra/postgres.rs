//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::AccountId;
use sqlx::PgPool;

use crate::domain::entity::account::{Account, NewAccount};
use crate::domain::repository::AccountDirectory;
use crate::domain::value_object::{email::Email, password::PasswordDigest};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed account directory over the `users` table
#[derive(Clone)]
pub struct PgAccountDirectory {
    pool: PgPool,
}

impl PgAccountDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AccountDirectory for PgAccountDirectory {
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                id,
                email,
                password_hash,
                created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn create(&self, account: &NewAccount) -> AuthResult<Account> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO users (
                email,
                password_hash
            ) VALUES ($1, $2)
            RETURNING
                id,
                email,
                password_hash,
                created_at
            "#,
        )
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AuthError::DuplicateIdentity
            }
            other => AuthError::Database(other),
        })?;

        row.into_account()
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AuthResult<Account> {
        Ok(Account {
            id: AccountId::new(self.id),
            email: Email::from_db(self.email),
            password_hash: PasswordDigest::from_phc_string(self.password_hash)?,
            created_at: self.created_at,
        })
    }
}
