//! # Service Configuration
//!
//! Read once at startup from the process environment (after `dotenv` has
//! merged any `.env` file).
//!
//! | Variable                         | Default | Notes                          |
//! |----------------------------------|---------|--------------------------------|
//! | `PORT`                           | 8080    |                                |
//! | `DATABASE_URL`                   | unset   | unset = in-memory only         |
//! | `JWT_SECRET`                     | random  | random secret does not survive restarts |
//! | `JWT_TTL_HOURS`                  | 24      |                                |
//! | `RATE_LIMIT_REQUESTS_PER_MINUTE` | 100     |                                |
//! | `RATE_LIMIT_BURST`               | 50      | per second                     |
//! | `TRUST_PROXY_HEADERS`            | false   | honour `X-Forwarded-For`       |
//! | `VALIDATION_CONTEXT_POLICY`      | closed  | `open` or `closed`             |
//!
//! Unparseable numbers fall back to the default with a warning. A
//! `DATABASE_URL` that is not a Postgres URL is a startup error.

use std::str::FromStr;

use jobboard_validate::ContextPolicy;
use thiserror::Error;
use uuid::Uuid;

/// Errors that abort startup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `DATABASE_URL` is set but does not use a Postgres scheme.
    #[error("DATABASE_URL must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    /// `VALIDATION_CONTEXT_POLICY` is neither `open` nor `closed`.
    #[error("VALIDATION_CONTEXT_POLICY must be 'open' or 'closed', got '{0}'")]
    InvalidPolicy(String),
}

/// Application configuration.
///
/// Custom `Debug` redacts the JWT secret and the database URL.
#[derive(Clone)]
pub struct AppConfig {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Postgres connection string. `None` runs in-memory only.
    pub database_url: Option<String>,
    /// HMAC secret for access tokens.
    pub jwt_secret: String,
    /// Access token lifetime.
    pub jwt_ttl_hours: i64,
    /// Requests allowed per client per minute.
    pub rate_limit_per_minute: u32,
    /// Requests allowed per client per second.
    pub rate_limit_burst: u32,
    /// Identify clients by `X-Forwarded-For` / `X-Real-IP`. Only safe behind
    /// a proxy that overwrites those headers.
    pub trust_proxy_headers: bool,
    /// What role rules do when a request is validated without a caller.
    pub validation_policy: ContextPolicy,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_ttl_hours", &self.jwt_ttl_hours)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .field("trust_proxy_headers", &self.trust_proxy_headers)
            .field("validation_policy", &self.validation_policy)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            database_url: None,
            jwt_secret: ephemeral_secret(),
            jwt_ttl_hours: 24,
            rate_limit_per_minute: 100,
            rate_limit_burst: 50,
            trust_proxy_headers: false,
            validation_policy: ContextPolicy::FailClosed,
        }
    }
}

impl AppConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        if let Some(url) = &database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                return Err(ConfigError::InvalidDatabaseUrl);
            }
        }

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    "JWT_SECRET not set, using a random secret. Tokens will not survive restarts."
                );
                defaults.jwt_secret
            }
        };

        let validation_policy = match lookup("VALIDATION_CONTEXT_POLICY").as_deref() {
            None | Some("closed") => ContextPolicy::FailClosed,
            Some("open") => ContextPolicy::FailOpen,
            Some(other) => return Err(ConfigError::InvalidPolicy(other.to_string())),
        };

        Ok(Self {
            port: parse_or(&lookup, "PORT", defaults.port),
            database_url,
            jwt_secret,
            jwt_ttl_hours: parse_or(&lookup, "JWT_TTL_HOURS", defaults.jwt_ttl_hours),
            rate_limit_per_minute: parse_or(
                &lookup,
                "RATE_LIMIT_REQUESTS_PER_MINUTE",
                defaults.rate_limit_per_minute,
            ),
            rate_limit_burst: parse_or(&lookup, "RATE_LIMIT_BURST", defaults.rate_limit_burst),
            trust_proxy_headers: parse_or(
                &lookup,
                "TRUST_PROXY_HEADERS",
                defaults.trust_proxy_headers,
            ),
            validation_policy,
        })
    }
}

/// Parse `key`, or warn and fall back to `default`.
fn parse_or<T: FromStr + std::fmt::Display + Copy>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = key, value = %raw, fallback = %default, "invalid value, using default");
            default
        }),
    }
}

fn ephemeral_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = from_pairs(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.rate_limit_per_minute, 100);
        assert_eq!(config.rate_limit_burst, 50);
        assert!(!config.trust_proxy_headers);
        assert!(config.database_url.is_none());
        assert_eq!(config.validation_policy, ContextPolicy::FailClosed);
        assert_eq!(config.jwt_secret.len(), 64);
    }

    #[test]
    fn values_are_read() {
        let config = from_pairs(&[
            ("PORT", "9000"),
            ("DATABASE_URL", "postgres://jobs@localhost/jobs"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_HOURS", "2"),
            ("RATE_LIMIT_REQUESTS_PER_MINUTE", "10"),
            ("RATE_LIMIT_BURST", "3"),
            ("TRUST_PROXY_HEADERS", "true"),
            ("VALIDATION_CONTEXT_POLICY", "open"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.jwt_ttl_hours, 2);
        assert_eq!(config.rate_limit_per_minute, 10);
        assert_eq!(config.rate_limit_burst, 3);
        assert!(config.trust_proxy_headers);
        assert_eq!(config.validation_policy, ContextPolicy::FailOpen);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = from_pairs(&[("PORT", "eighty"), ("RATE_LIMIT_BURST", "-1")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rate_limit_burst, 50);
    }

    #[test]
    fn non_postgres_database_url_is_fatal() {
        assert_eq!(
            from_pairs(&[("DATABASE_URL", "mysql://localhost/jobs")]).unwrap_err(),
            ConfigError::InvalidDatabaseUrl
        );
    }

    #[test]
    fn unknown_policy_is_fatal() {
        assert!(matches!(
            from_pairs(&[("VALIDATION_CONTEXT_POLICY", "maybe")]),
            Err(ConfigError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = from_pairs(&[
            ("JWT_SECRET", "hunter2hunter2"),
            ("DATABASE_URL", "postgres://user:pw@db/jobs"),
        ])
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("user:pw"));
    }
}
