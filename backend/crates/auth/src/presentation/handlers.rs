//! HTTP Handlers

use axum::Json;
use axum::extract::{FromRef, State};
use axum::http::{HeaderMap, StatusCode, header};
use std::sync::Arc;

use platform::bearer::{extract_bearer, extract_bearer_or_bare};

use crate::application::config::AuthConfig;
use crate::application::token_codec::TokenCodec;
use crate::application::{
    LoginInput, LoginUseCase, RefreshInput, RefreshOutcome, RefreshUseCase, SignUpInput,
    SignUpUseCase,
};
use crate::domain::entity::account::AuthenticatedAccount;
use crate::domain::repository::{AccountDirectory, SessionStore};
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, MeResponse, RefreshResponse, SignUpRequest, SignUpResponse,
    StillValidResponse, TokenPairResponse,
};

/// Shared state for auth handlers
pub struct AuthAppState<A, S>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    pub accounts: Arc<A>,
    pub sessions: Arc<S>,
    pub codec: Arc<TokenCodec>,
    pub config: Arc<AuthConfig>,
}

impl<A, S> AuthAppState<A, S>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    pub fn new(accounts: A, sessions: S, config: AuthConfig) -> Self {
        let codec = Arc::new(TokenCodec::new(&config));
        Self {
            accounts: Arc::new(accounts),
            sessions: Arc::new(sessions),
            codec,
            config: Arc::new(config),
        }
    }
}

// `A` and `S` need not be `Clone`
impl<A, S> Clone for AuthAppState<A, S>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            accounts: self.accounts.clone(),
            sessions: self.sessions.clone(),
            codec: self.codec.clone(),
            config: self.config.clone(),
        }
    }
}

impl<A, S> FromRef<AuthAppState<A, S>> for Arc<TokenCodec>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    fn from_ref(state: &AuthAppState<A, S>) -> Self {
        state.codec.clone()
    }
}

impl<A, S> FromRef<AuthAppState<A, S>> for Arc<AuthConfig>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    fn from_ref(state: &AuthAppState<A, S>) -> Self {
        state.config.clone()
    }
}

// ============================================================================
// Sign Up
// ============================================================================

/// POST /auth/signup
pub async fn sign_up<A, S>(
    State(state): State<AuthAppState<A, S>>,
    Json(req): Json<SignUpRequest>,
) -> AuthResult<(StatusCode, Json<SignUpResponse>)>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = SignUpUseCase::new(state.accounts.clone(), state.config.clone());

    let output = use_case
        .execute(SignUpInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            id: output.account_id.value(),
            email: output.email,
            created_at: output.created_at,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /auth/login
pub async fn login<A, S>(
    State(state): State<AuthAppState<A, S>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<Json<TokenPairResponse>>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.accounts.clone(),
        state.sessions.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email,
            password: req.password,
        })
        .await?;

    Ok(Json(output.tokens.into()))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /auth/refresh
///
/// `Authorization: Bearer <access>` is optional; a still-valid access token
/// answers `stillValid` without looking at the refresh header. The refresh
/// token travels in the configured refresh header, with or without the
/// bearer prefix.
pub async fn refresh<A, S>(
    State(state): State<AuthAppState<A, S>>,
    headers: HeaderMap,
) -> AuthResult<Json<RefreshResponse>>
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let prefix = &state.config.bearer_prefix;
    let access_token = extract_bearer(&headers, &header::AUTHORIZATION, prefix);
    let refresh_token = extract_bearer_or_bare(&headers, &state.config.refresh_header, prefix);

    let use_case = RefreshUseCase::new(
        state.sessions.clone(),
        state.codec.clone(),
        state.config.clone(),
    );

    let outcome = use_case
        .execute(RefreshInput {
            access_token,
            refresh_token,
        })
        .await?;

    Ok(Json(match outcome {
        RefreshOutcome::StillValid => {
            RefreshResponse::StillValid(StillValidResponse { still_valid: true })
        }
        RefreshOutcome::Rotated(pair) => RefreshResponse::Rotated(pair.into()),
    }))
}

// ============================================================================
// Current Account
// ============================================================================

/// GET /auth/me
pub async fn me(account: AuthenticatedAccount) -> Json<MeResponse> {
    Json(MeResponse {
        id: account.account_id.value(),
        email: account.email,
    })
}
