//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.
//!
//! Variants carry server-side detail; clients only ever see the public
//! message from [`AuthError::to_app_error`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordPolicyError;
use thiserror::Error;

use crate::domain::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const INVALID_REFRESH_TOKEN: &str = "Invalid refresh token";
const UNAUTHORIZED: &str = "Unauthorized";

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Password validation failed: {0}")]
    PasswordValidation(#[from] PasswordPolicyError),

    /// Email already registered
    #[error("Email already registered")]
    DuplicateIdentity,

    /// No account for the submitted email
    #[error("Account not found")]
    AccountNotFound,

    /// Wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing access token")]
    MissingAccessToken,

    #[error("Invalid access token: {0}")]
    InvalidAccessToken(TokenError),

    #[error("Missing refresh token")]
    MissingRefreshToken,

    #[error("Invalid refresh token: {0}")]
    InvalidRefresh(TokenError),

    /// Refresh token valid but no session record for the identity
    #[error("No session for identity")]
    SessionNotFound,

    /// Refresh token valid but not the one currently stored
    #[error("Refresh token does not match the current session")]
    SessionMismatch,

    #[error("Session store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Codec fault while issuing
    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidEmail(_) | AuthError::PasswordValidation(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::DuplicateIdentity => StatusCode::CONFLICT,
            AuthError::AccountNotFound
            | AuthError::InvalidCredentials
            | AuthError::MissingAccessToken
            | AuthError::InvalidAccessToken(_)
            | AuthError::MissingRefreshToken
            | AuthError::InvalidRefresh(_)
            | AuthError::SessionNotFound
            | AuthError::SessionMismatch => StatusCode::UNAUTHORIZED,
            AuthError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Hashing(_)
            | AuthError::Token(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidEmail(_) | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::DuplicateIdentity => ErrorKind::Conflict,
            AuthError::AccountNotFound
            | AuthError::InvalidCredentials
            | AuthError::MissingAccessToken
            | AuthError::InvalidAccessToken(_)
            | AuthError::MissingRefreshToken
            | AuthError::InvalidRefresh(_)
            | AuthError::SessionNotFound
            | AuthError::SessionMismatch => ErrorKind::Unauthorized,
            AuthError::StoreUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Hashing(_)
            | AuthError::Token(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to the client-facing AppError
    ///
    /// Unknown email and wrong password share one message, as do every
    /// refresh failure.
    pub fn to_app_error(&self) -> AppError {
        let kind = self.kind();
        match self {
            AuthError::InvalidEmail(msg) => AppError::new(kind, msg.clone())
                .with_action("Please enter a valid email address"),
            AuthError::PasswordValidation(e) => AppError::new(kind, e.to_string())
                .with_action("Please choose a different password"),
            AuthError::DuplicateIdentity => AppError::new(kind, "Email already registered")
                .with_action("Log in with this email instead"),
            AuthError::AccountNotFound | AuthError::InvalidCredentials => {
                AppError::new(kind, INVALID_CREDENTIALS)
            }
            AuthError::MissingAccessToken | AuthError::InvalidAccessToken(_) => {
                AppError::new(kind, UNAUTHORIZED)
            }
            AuthError::MissingRefreshToken
            | AuthError::InvalidRefresh(_)
            | AuthError::SessionNotFound
            | AuthError::SessionMismatch => AppError::new(kind, INVALID_REFRESH_TOKEN)
                .with_action("Please log in again"),
            AuthError::StoreUnavailable(_) => {
                AppError::new(kind, "Service temporarily unavailable")
                    .with_action("Please retry shortly")
            }
            AuthError::Hashing(_)
            | AuthError::Token(_)
            | AuthError::Database(_)
            | AuthError::Internal(_) => AppError::new(kind, "Internal server error"),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::StoreUnavailable(msg) => {
                tracing::error!(message = %msg, "Session store unavailable");
            }
            AuthError::Hashing(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Token(e) => {
                tracing::error!(error = %e, "Token issuance failed");
            }
            AuthError::InvalidCredentials | AuthError::AccountNotFound => {
                tracing::warn!(reason = %self, "Invalid login attempt");
            }
            AuthError::SessionMismatch => {
                tracing::warn!("Refresh token does not match current session");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AuthError::InvalidEmail("x".into()), 400),
            (
                AuthError::PasswordValidation(PasswordPolicyError::CommonPattern),
                400,
            ),
            (AuthError::DuplicateIdentity, 409),
            (AuthError::AccountNotFound, 401),
            (AuthError::InvalidCredentials, 401),
            (AuthError::InvalidAccessToken(TokenError::Expired), 401),
            (AuthError::MissingRefreshToken, 401),
            (AuthError::SessionNotFound, 401),
            (AuthError::SessionMismatch, 401),
            (AuthError::StoreUnavailable("down".into()), 503),
            (AuthError::Hashing("boom".into()), 500),
            (AuthError::Token(TokenError::Signing("boom".into())), 500),
            (AuthError::Internal("boom".into()), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{err}");
            assert_eq!(err.kind().status_code(), status, "{err}");
        }
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let unknown = AuthError::AccountNotFound.to_app_error();
        let wrong = AuthError::InvalidCredentials.to_app_error();
        assert_eq!(unknown.message(), wrong.message());
        assert_eq!(unknown.message(), "Invalid credentials");
    }

    #[test]
    fn test_refresh_failures_share_message() {
        for err in [
            AuthError::MissingRefreshToken,
            AuthError::InvalidRefresh(TokenError::Expired),
            AuthError::SessionNotFound,
            AuthError::SessionMismatch,
        ] {
            assert_eq!(err.to_app_error().message(), "Invalid refresh token");
        }
    }

    #[test]
    fn test_internal_detail_is_not_exposed() {
        let err = AuthError::StoreUnavailable("redis://10.0.0.3:6379 refused".into());
        assert!(!err.to_app_error().message().contains("redis"));

        let err = AuthError::Internal("secret detail".into());
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }
}
