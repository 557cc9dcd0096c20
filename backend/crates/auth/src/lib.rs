//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, token claims, repository traits
//! - `application/` - Use cases, token codec, configuration
//! - `infra/` - PostgreSQL, Redis and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router, extractor
//!
//! ## Features
//! - Sign-up with email + password
//! - Login issuing an access/refresh JWT pair (HS256)
//! - Stateless access-token validation
//! - Refresh-token rotation against one session record per identity
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Only the most recently issued refresh token is accepted
//! - Refresh tokens compared in constant time
//! - Tokens never logged, only a short SHA-256 fingerprint

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token_codec::{TokenCodec, TokenPair};
pub use domain::entity::account::AuthenticatedAccount;
pub use error::{AuthError, AuthResult};
pub use infra::{postgres::PgAccountDirectory, redis_store::RedisSessionStore};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
