//! Configuration module for environment variable parsing.
//!
//! Configuration is read once at startup and never mutated afterwards.

use std::env;

use crate::error::ConfigError;

/// Port used when `WEBHOOK_PORT` is not set.
pub const DEFAULT_PORT: u16 = 4446;

/// Environment variable holding the shared webhook secret.
pub const SECRET_VAR: &str = "webhook_verify";

/// Upper-case spelling of [`SECRET_VAR`], accepted as a fallback.
pub const SECRET_VAR_FALLBACK: &str = "WEBHOOK_VERIFY";

/// Environment variable holding the listen port.
pub const PORT_VAR: &str = "WEBHOOK_PORT";

/// Server configuration loaded from environment variables.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Shared secret expected verbatim in the `Authorization` header
    pub verify_secret: String,

    /// Port for the web server to listen on (all interfaces)
    pub port: u16,
}

impl Config {
    /// Build a configuration directly, e.g. for embedding or tests.
    pub fn new(verify_secret: impl Into<String>, port: u16) -> Self {
        Self {
            verify_secret: verify_secret.into(),
            port,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Fails if the secret is missing or blank, or if the port is set but is
    /// not a valid `u16`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let verify_secret = lookup(SECRET_VAR)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| lookup(SECRET_VAR_FALLBACK))
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingSecret)?;

        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value: raw, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            verify_secret,
            port,
        })
    }
}

// The secret must never end up in logs through `?config`.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("verify_secret", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}
