//! Authenticated Account Extractor
//!
//! Handlers that take an [`AuthenticatedAccount`] argument only run for
//! requests carrying a valid access token in `Authorization`.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;
use platform::bearer::extract_bearer;

use crate::application::check_access::CheckAccessUseCase;
use crate::application::config::AuthConfig;
use crate::application::token_codec::TokenCodec;
use crate::domain::entity::account::AuthenticatedAccount;
use crate::error::AuthError;

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    Arc<TokenCodec>: FromRef<S>,
    Arc<AuthConfig>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = Arc::<AuthConfig>::from_ref(state);
        let token = extract_bearer(&parts.headers, &header::AUTHORIZATION, &config.bearer_prefix)
            .ok_or(AuthError::MissingAccessToken)?;

        CheckAccessUseCase::new(Arc::<TokenCodec>::from_ref(state)).execute(&token)
    }
}
