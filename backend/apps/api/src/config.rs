//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::AuthConfig;
use platform::bearer::normalize_prefix;
use sqlx::postgres::PgConnectOptions;

const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:40922,http://127.0.0.1:40922";

/// Upper bound for any `*_MINUTES` setting (one year)
const MAX_MINUTES: u64 = 365 * 24 * 60;

/// Connection pool sizing and per-call deadlines for PostgreSQL
#[derive(Debug, Clone)]
pub struct PgPoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    /// How long a request waits for a pooled connection
    pub acquire_timeout: Duration,
    /// Server-side `statement_timeout` for every connection
    pub statement_timeout: Duration,
}

impl PgPoolSettings {
    /// Connection options for `url` with the statement timeout applied
    pub fn connect_options(&self, url: &str) -> anyhow::Result<PgConnectOptions> {
        let options = PgConnectOptions::from_str(url).context("DATABASE_URL is not a valid URL")?;
        Ok(options.options([(
            "statement_timeout",
            self.statement_timeout.as_millis().to_string(),
        )]))
    }
}

/// Everything the binary needs to start
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_address: SocketAddr,
    pub database_url: String,
    pub pg_pool: PgPoolSettings,
    pub redis_url: String,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get("SECRET_KEY").context("SECRET_KEY must be set")?;
        if secret.len() < 32 {
            bail!("SECRET_KEY must be at least 32 bytes");
        }

        let defaults = AuthConfig::default();
        let auth = AuthConfig {
            jwt_secret: secret.into_bytes(),
            access_ttl: minutes(&get, "ACCESS_TTL_MINUTES", defaults.access_ttl)?,
            refresh_ttl: minutes(&get, "REFRESH_TTL_MINUTES", defaults.refresh_ttl)?,
            session_ttl: minutes(&get, "SESSION_TTL_MINUTES", defaults.session_ttl)?,
            bearer_prefix: get("AUTH_BEARER_PREFIX")
                .map(|p| normalize_prefix(&p))
                .unwrap_or(defaults.bearer_prefix.clone()),
            store_timeout: millis(&get, "STORE_TIMEOUT_MS", defaults.store_timeout)?,
            password_pepper: get("PASSWORD_PEPPER").map(String::into_bytes),
            ..defaults
        };

        if auth.access_ttl >= auth.refresh_ttl {
            bail!("ACCESS_TTL_MINUTES must be shorter than REFRESH_TTL_MINUTES");
        }

        let server_address = get("SERVER_ADDRESS")
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string())
            .parse()
            .context("SERVER_ADDRESS must be host:port")?;

        let pg_pool = PgPoolSettings {
            max_connections: parse_or(&get, "PG_MAX_CONNS", 5)?,
            min_connections: parse_or(&get, "PG_MIN_CONNS", 0)?,
            max_lifetime: minutes(&get, "PG_MAX_CONN_LIFETIME", Duration::from_secs(30 * 60))?,
            acquire_timeout: millis(&get, "PG_ACQUIRE_TIMEOUT_MS", Duration::from_secs(3))?,
            statement_timeout: millis(&get, "PG_STATEMENT_TIMEOUT_MS", Duration::from_secs(5))?,
        };

        let frontend_origins = get("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            server_address,
            database_url: get("DATABASE_URL").context("DATABASE_URL must be set")?,
            pg_pool,
            redis_url: get("REDIS_URL").context("REDIS_URL must be set")?,
            frontend_origins,
            auth,
        })
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        None => Ok(default),
    }
}

fn minutes(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    let value: u64 = parse_or(get, key, default.as_secs() / 60)?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    if value > MAX_MINUTES {
        bail!("{key} must be at most {MAX_MINUTES} minutes, got {value}");
    }
    let secs = value
        .checked_mul(60)
        .with_context(|| format!("{key} is out of range"))?;
    Ok(Duration::from_secs(secs))
}

fn millis(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> anyhow::Result<Duration> {
    let default = u64::try_from(default.as_millis()).unwrap_or(u64::MAX);
    let value: u64 = parse_or(get, key, default)?;
    if value == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(Duration::from_millis(value))
}
