//! Application Layer
//!
//! Use cases and application services.

pub mod check_access;
pub mod config;
pub mod login;
pub mod refresh;
pub mod sign_up;
pub mod token_codec;

// Re-exports
pub use check_access::CheckAccessUseCase;
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use refresh::{RefreshInput, RefreshOutcome, RefreshUseCase};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token_codec::{IssuedToken, TokenCodec, TokenPair};
