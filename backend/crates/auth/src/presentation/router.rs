//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};
use redis::aio::ConnectionManager;
use sqlx::PgPool;

use crate::application::config::AuthConfig;
use crate::domain::repository::{AccountDirectory, SessionStore};
use crate::infra::{postgres::PgAccountDirectory, redis_store::RedisSessionStore};
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router over PostgreSQL accounts and Redis sessions
pub fn auth_router(pool: PgPool, redis: ConnectionManager, config: AuthConfig) -> Router {
    let sessions = RedisSessionStore::new(redis, &config);
    auth_router_generic(PgAccountDirectory::new(pool), sessions, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<A, S>(accounts: A, sessions: S, config: AuthConfig) -> Router
where
    A: AccountDirectory + Send + Sync + 'static,
    S: SessionStore + Send + Sync + 'static,
{
    let state = AuthAppState::new(accounts, sessions, config);

    Router::new()
        .route("/signup", post(handlers::sign_up::<A, S>))
        .route("/login", post(handlers::login::<A, S>))
        .route("/refresh", post(handlers::refresh::<A, S>))
        .route("/me", get(handlers::me))
        .with_state(state)
}
