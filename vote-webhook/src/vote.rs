//! Vote event model and lenient body parsing.
//!
//! A vote body is best-effort: a body that is not valid JSON becomes an empty
//! [`VoteEvent`] after the caller logs the [`VoteParseError`]. Valid JSON of
//! the wrong shape is a fault the caller must not paper over.

use serde_json::Value;
use thiserror::Error;

/// A vote notification, reduced to the voting user's identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteEvent {
    /// Identifier of the user who voted, if the payload carried one
    pub user: Option<String>,
}

/// Why a request body could not be turned into a [`VoteEvent`].
#[derive(Error, Debug)]
pub enum VoteParseError {
    #[error("request body is empty")]
    EmptyBody,

    #[error("failed to read request body: {0}")]
    Read(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

impl VoteEvent {
    /// Parse a vote from a request body, whatever its declared content type.
    pub fn parse(body: &[u8]) -> Result<Self, VoteParseError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(VoteParseError::EmptyBody);
        }

        let value: Value = serde_json::from_slice(body)?;
        let map = match value {
            Value::Object(map) => map,
            other => return Err(VoteParseError::NotAnObject(json_kind(&other))),
        };

        Ok(Self {
            user: map.get("user").and_then(user_id),
        })
    }
}

impl VoteParseError {
    /// Whether the body simply was not JSON, so an empty event stands in.
    ///
    /// `NotAnObject` is not malformed: the JSON parsed but cannot carry a vote.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, VoteParseError::NotAnObject(_))
    }
}

/// Strings pass through; numeric ids are rendered as text.
fn user_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
