//! Sign Up Use Case
//!
//! Registers a new account. No session is created.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use kernel::id::AccountId;

use crate::application::config::AuthConfig;
use crate::domain::entity::account::NewAccount;
use crate::domain::repository::AccountDirectory;
use crate::domain::value_object::{
    email::Email,
    password::{PasswordDigest, RawPassword},
};
use crate::error::{AuthError, AuthResult};

/// Sign up input
pub struct SignUpInput {
    pub email: String,
    pub password: String,
}

/// Sign up output
#[derive(Debug, Clone)]
pub struct SignUpOutput {
    pub account_id: AccountId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Sign up use case
pub struct SignUpUseCase<A>
where
    A: AccountDirectory,
{
    accounts: Arc<A>,
    config: Arc<AuthConfig>,
}

impl<A> SignUpUseCase<A>
where
    A: AccountDirectory,
{
    pub fn new(accounts: Arc<A>, config: Arc<AuthConfig>) -> Self {
        Self { accounts, config }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email = Email::new(&input.email)?;

        if self.accounts.exists_by_email(&email).await? {
            return Err(AuthError::DuplicateIdentity);
        }

        // Validate and hash password
        let raw_password = RawPassword::new(input.password)?;
        let password_hash = PasswordDigest::from_raw(&raw_password, self.config.pepper())?;

        // A concurrent sign-up for the same email surfaces here as DuplicateIdentity
        let account = self
            .accounts
            .create(&NewAccount {
                email,
                password_hash,
            })
            .await?;

        tracing::info!(
            account_id = %account.id,
            email = %account.email,
            "Account signed up"
        );

        Ok(SignUpOutput {
            account_id: account.id,
            email: account.email.into_db(),
            created_at: account.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryAccountDirectory;

    fn use_case(accounts: &InMemoryAccountDirectory) -> SignUpUseCase<InMemoryAccountDirectory> {
        SignUpUseCase::new(
            Arc::new(accounts.clone()),
            Arc::new(AuthConfig::with_random_secret()),
        )
    }

    fn input(email: &str, password: &str) -> SignUpInput {
        SignUpInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_account_gets_id_one() {
        let accounts = InMemoryAccountDirectory::new();
        let output = use_case(&accounts)
            .execute(input("Buyer@Example.com", "MySecure#Pass2024"))
            .await
            .unwrap();

        assert_eq!(output.account_id, AccountId::new(1));
        assert_eq!(output.email, "buyer@example.com");
        assert_eq!(accounts.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let accounts = InMemoryAccountDirectory::new();
        let sign_up = use_case(&accounts);

        sign_up
            .execute(input("buyer@example.com", "MySecure#Pass2024"))
            .await
            .unwrap();
        let err = sign_up
            .execute(input("BUYER@example.com", "Another#Pass2024"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::DuplicateIdentity));
        assert_eq!(accounts.len().await, 1);
    }

    #[tokio::test]
    async fn test_invalid_email() {
        let accounts = InMemoryAccountDirectory::new();
        let err = use_case(&accounts)
            .execute(input("not-an-email", "MySecure#Pass2024"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidEmail(_)));
        assert_eq!(accounts.len().await, 0);
    }

    #[tokio::test]
    async fn test_weak_password() {
        let accounts = InMemoryAccountDirectory::new();
        let err = use_case(&accounts)
            .execute(input("buyer@example.com", "password123"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::PasswordValidation(_)));
        assert_eq!(accounts.len().await, 0);
    }

    #[tokio::test]
    async fn test_stores_digest_not_secret() {
        let accounts = InMemoryAccountDirectory::new();
        use_case(&accounts)
            .execute(input("buyer@example.com", "MySecure#Pass2024"))
            .await
            .unwrap();

        let stored = accounts
            .find_by_email(&Email::new("buyer@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(!stored.password_hash.as_phc_string().contains("MySecure"));
        assert!(
            stored
                .password_hash
                .verify(&RawPassword::for_login("MySecure#Pass2024".into()), None)
        );
    }
}
