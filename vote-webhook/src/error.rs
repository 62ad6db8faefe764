//! Error types for startup and server lifecycle.
//!
//! Per-request failures never surface here; handlers map them to HTTP
//! responses and log them.

use std::net::SocketAddr;

use thiserror::Error;

/// Fatal configuration problems detected before the listener binds.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("webhook_verify environment variable not set")]
    MissingSecret,

    #[error("invalid WEBHOOK_PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Errors raised while starting or running the webhook server.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}, port may already be in use or blocked: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
