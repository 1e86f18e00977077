//! Error types for card rendering.

use thiserror::Error;

/// Failures that abort rendering of a single segment.
///
/// Subtypes the client knows but cannot draw are not errors; they render a
/// placeholder (see [`CardKind::Unsupported`](crate::CardKind::Unsupported)).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    /// JSON card payload is not valid JSON or has no usable `meta` object.
    #[error("malformed card payload: {0}")]
    MalformedPayload(String),
    /// XML card payload lacks the `<item` body or the `</msg>` terminator.
    #[error("xml card is missing its <item> body or </msg> envelope")]
    MissingEnvelope,
}

impl From<serde_json::Error> for CardError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}
