//! Shared-secret authentication for the vote webhook.
//!
//! Vote providers send the secret verbatim in the `Authorization` header.

use axum::http::{header::AUTHORIZATION, HeaderMap};

/// Result of checking the `Authorization` header.
///
/// `Missing` and `Invalid` only differ in logs; callers respond identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Valid,
    Missing,
    Invalid,
}

impl AuthOutcome {
    pub fn is_valid(self) -> bool {
        self == AuthOutcome::Valid
    }
}

/// Check the `Authorization` header against the configured secret.
///
/// Uses plain string equality, which is not constant-time. A non-UTF-8
/// header value counts as invalid.
pub fn verify_authorization(headers: &HeaderMap, secret: &str) -> AuthOutcome {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return AuthOutcome::Missing;
    };

    // Not constant-time: response latency can reveal how long a matching
    // prefix the caller guessed.
    match value.to_str() {
        Ok(provided) if provided == secret => AuthOutcome::Valid,
        _ => AuthOutcome::Invalid,
    }
}
