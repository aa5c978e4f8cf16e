//! Application configuration loaded from environment variables.
//!
//! Loading is fail-fast: a missing signing key or an invalid value aborts
//! startup with a clear error message.

use setsisaw_auth::{
    SessionConfig, SigningSecret, DEFAULT_REFRESH_WINDOW_SECS, DEFAULT_TOKEN_LIFETIME_SECS,
};
use std::env;
use thiserror::Error;

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,setsisaw=debug";

/// Longest accepted token lifetime (one year).
pub const MAX_TOKEN_LIFETIME_SECS: i64 = 365 * 24 * 60 * 60;

/// Largest accepted expiry leeway (one day).
pub const MAX_TOKEN_LEEWAY_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("Failed to parse port: {0}")]
    InvalidPort(#[from] std::num::ParseIntError),
}

/// Application configuration.
#[derive(Clone)]
pub struct Config {
    /// HMAC secret for signing tokens.
    pub jwt_signing_key: String,
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    pub token_lifetime_secs: i64,
    pub token_refresh_window_secs: i64,
    pub token_leeway_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("jwt_signing_key", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("token_lifetime_secs", &self.token_lifetime_secs)
            .field("token_refresh_window_secs", &self.token_refresh_window_secs)
            .field("token_leeway_secs", &self.token_leeway_secs)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - `JWT_SIGNING_KEY` is missing or empty
    /// - `PORT` is not a valid port
    /// - A token timing variable is not a number or is out of range
    ///   (lifetime above one year, leeway above one day)
    ///
    /// # Environment Variables
    ///
    /// Required:
    /// - `JWT_SIGNING_KEY` - HMAC secret for signing tokens
    ///
    /// Optional:
    /// - `HOST` - Bind address (default: "0.0.0.0")
    /// - `PORT` - Bind port (default: 8080)
    /// - `RUST_LOG` - Log level filter (default: "info,setsisaw=debug")
    /// - `TOKEN_LIFETIME_SECS` - Token lifetime (default: 300)
    /// - `TOKEN_REFRESH_WINDOW_SECS` - Refresh window (default: 60)
    /// - `TOKEN_LEEWAY_SECS` - Expiry clock skew tolerance (default: 0)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_signing_key = lookup("JWT_SIGNING_KEY")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingVar("JWT_SIGNING_KEY".to_string()))?;

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()?;

        if port == 0 {
            return Err(ConfigError::InvalidValue {
                var: "PORT".to_string(),
                message: "Port must be between 1 and 65535".to_string(),
            });
        }

        let token_lifetime_secs =
            parse_number(&lookup, "TOKEN_LIFETIME_SECS", DEFAULT_TOKEN_LIFETIME_SECS)?;
        let token_refresh_window_secs = parse_number(
            &lookup,
            "TOKEN_REFRESH_WINDOW_SECS",
            DEFAULT_REFRESH_WINDOW_SECS,
        )?;
        let token_leeway_secs: u64 = parse_number(&lookup, "TOKEN_LEEWAY_SECS", 0)?;

        if token_lifetime_secs <= 0 || token_lifetime_secs > MAX_TOKEN_LIFETIME_SECS {
            return Err(ConfigError::InvalidValue {
                var: "TOKEN_LIFETIME_SECS".to_string(),
                message: format!(
                    "Must be greater than zero and at most {MAX_TOKEN_LIFETIME_SECS}"
                ),
            });
        }

        if token_refresh_window_secs <= 0 || token_refresh_window_secs > token_lifetime_secs {
            return Err(ConfigError::InvalidValue {
                var: "TOKEN_REFRESH_WINDOW_SECS".to_string(),
                message: format!(
                    "Must be greater than zero and at most the token lifetime ({token_lifetime_secs})"
                ),
            });
        }

        if token_leeway_secs > MAX_TOKEN_LEEWAY_SECS {
            return Err(ConfigError::InvalidValue {
                var: "TOKEN_LEEWAY_SECS".to_string(),
                message: format!("Must be at most {MAX_TOKEN_LEEWAY_SECS}"),
            });
        }

        Ok(Self {
            jwt_signing_key,
            host,
            port,
            rust_log,
            token_lifetime_secs,
            token_refresh_window_secs,
            token_leeway_secs,
        })
    }

    /// Get the server bind address as a socket address string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Token timing for the session manager.
    ///
    /// Values past chrono's range saturate; [`Self::from_lookup`] never
    /// produces them.
    pub fn session_config(&self) -> SessionConfig {
        let seconds = |secs: i64| {
            chrono::Duration::try_seconds(secs).unwrap_or(chrono::Duration::MAX)
        };
        SessionConfig {
            lifetime: seconds(self.token_lifetime_secs),
            refresh_window: seconds(self.token_refresh_window_secs),
            leeway: self.token_leeway_secs,
        }
    }

    /// The signing key as a [`SigningSecret`].
    pub fn signing_secret(&self) -> Result<SigningSecret, ConfigError> {
        SigningSecret::new(self.jwt_signing_key.as_bytes()).map_err(|e| {
            ConfigError::InvalidValue {
                var: "JWT_SIGNING_KEY".to_string(),
                message: e.to_string(),
            }
        })
    }
}

fn parse_number<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            var: var.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
