//! Server configuration loaded from environment variables.
//!
//! | Variable                   | Default     |
//! |----------------------------|-------------|
//! | `HOST`                     | `0.0.0.0`   |
//! | `PORT`                     | `8080`      |
//! | `DATABASE_URL`             | unset       |
//! | `DATABASE_MAX_CONNECTIONS` | `10`        |
//! | `AUTH_JWT_SECRET`          | required    |
//! | `AUTH_TOKEN_TTL`           | `7200` (s)  |
//! | `RESOLVE_POLICY`           | `any`       |
//! | `DEFAULT_PAGE_LIMIT`       | `30`        |
//! | `OPERATION_TIMEOUT`        | `10` (s)    |
//! | `RESOLVE_TIMEOUT`          | `5` (s)     |
//! | `METRICS_PORT`             | unset       |
//! | `SHUTDOWN_TIMEOUT`         | `30` (s)    |
//!
//! Without `DATABASE_URL` the server keeps requests in memory.

use maker_checker_core::{CredentialConfig, LifecycleConfig, ResolvePolicy};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("{name} has an invalid value: {reason}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Why the value was rejected
        reason: String,
    },
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// PostgreSQL connection string; `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// PostgreSQL pool size.
    pub database_max_connections: u32,
    /// HMAC secret for credentials.
    pub jwt_secret: String,
    /// Lifetime of issued credentials.
    pub token_ttl: Duration,
    /// Who may resolve pending requests.
    pub resolve_policy: ResolvePolicy,
    /// Page size when the caller sends no usable limit.
    pub default_page_limit: u64,
    /// Upper bound on one request store call.
    pub operation_timeout: Duration,
    /// Upper bound on one identity resolution.
    pub resolve_timeout: Duration,
    /// Port for the Prometheus exporter; `None` disables it.
    pub metrics_port: Option<u16>,
    /// How long in-flight requests may run after a shutdown signal.
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `AUTH_JWT_SECRET` is missing or a variable
    /// cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if set.
    ///
    /// # Errors
    ///
    /// Same as [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let jwt_secret = var("AUTH_JWT_SECRET").ok_or(ConfigError::Missing("AUTH_JWT_SECRET"))?;

        let resolve_policy = match var("RESOLVE_POLICY") {
            Some(raw) => raw.parse::<ResolvePolicy>().map_err(|reason| ConfigError::Invalid {
                name: "RESOLVE_POLICY",
                reason,
            })?,
            None => ResolvePolicy::default(),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&var, "PORT", 8080)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or(&var, "DATABASE_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            token_ttl: Duration::from_secs(parse_or(&var, "AUTH_TOKEN_TTL", 7200)?),
            resolve_policy,
            default_page_limit: parse_or(&var, "DEFAULT_PAGE_LIMIT", 30)?,
            operation_timeout: Duration::from_secs(parse_or(&var, "OPERATION_TIMEOUT", 10)?),
            resolve_timeout: Duration::from_secs(parse_or(&var, "RESOLVE_TIMEOUT", 5)?),
            metrics_port: var("METRICS_PORT")
                .map(|raw| parse("METRICS_PORT", &raw))
                .transpose()?,
            shutdown_timeout: Duration::from_secs(parse_or(&var, "SHUTDOWN_TIMEOUT", 30)?),
        })
    }

    /// Address the HTTP listener binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Lifecycle engine configuration.
    #[must_use]
    pub const fn lifecycle_config(&self) -> LifecycleConfig {
        LifecycleConfig::new()
            .with_resolve_policy(self.resolve_policy)
            .with_default_page_limit(self.default_page_limit)
            .with_operation_timeout(self.operation_timeout)
    }

    /// Credential configuration.
    #[must_use]
    pub fn credential_config(&self) -> CredentialConfig {
        let ttl = chrono::Duration::from_std(self.token_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(2));
        CredentialConfig::new(self.jwt_secret.as_bytes())
            .with_token_ttl(ttl)
            .with_resolve_timeout(self.resolve_timeout)
    }
}

fn parse<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn parse_or<T, V>(var: &V, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
    V: Fn(&str) -> Option<String>,
{
    var(name).map_or(Ok(default), |raw| parse(name, &raw))
}

// Keeps the secret and the database password out of logs.
impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("resolve_policy", &self.resolve_policy)
            .field("default_page_limit", &self.default_page_limit)
            .field("operation_timeout", &self.operation_timeout)
            .field("resolve_timeout", &self.resolve_timeout)
            .field("metrics_port", &self.metrics_port)
            .field("shutdown_timeout", &self.shutdown_timeout)
            .finish()
    }
}
