//! Error types for browser-side operations.
//!
//! - [`FeedError`] - History feed loading errors
//! - [`ConnectionError`] - Messaging connection errors

use std::fmt;

/// Errors loading the history feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// Browser window not available
    NoWindow,
    /// Request could not be built
    Request(String),
    /// Fetch rejected (offline, blocked, ...)
    Network(String),
    /// Server answered with a non-2xx status
    Status(u16),
    /// Response body missing or not text
    Body,
    /// No response within the deadline
    Timeout,
    /// Body is not valid JSON
    Malformed(String),
    /// Body is JSON but not a list of messages
    NotAList,
}

impl fmt::Display for FeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => write!(f, "Browser window not available"),
            Self::Request(msg) => write!(f, "Could not request message history: {}", msg),
            Self::Network(msg) => write!(f, "Message history unreachable: {}", msg),
            Self::Status(status) => write!(f, "Message history request failed (HTTP {})", status),
            Self::Body => write!(f, "Message history response has no text body"),
            Self::Timeout => write!(f, "Message history request timed out"),
            Self::Malformed(msg) => write!(f, "Message history is not valid JSON: {}", msg),
            Self::NotAList => write!(f, "Message history is not a list of messages"),
        }
    }
}

impl std::error::Error for FeedError {}

/// Messaging connection errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// Socket could not be created for the endpoint
    OpenFailed(String),
    /// No socket has been opened
    NotConnected,
    /// Socket exists but is not in the OPEN state
    NotReady(u16),
    /// Request could not be encoded
    EncodeFailed(String),
    /// Browser rejected the frame
    SendFailed(String),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenFailed(url) => write!(f, "Failed to open connection to {}", url),
            Self::NotConnected => write!(f, "Not connected"),
            Self::NotReady(state) => write!(f, "Connection not ready (state {})", state),
            Self::EncodeFailed(msg) => write!(f, "Failed to encode request: {}", msg),
            Self::SendFailed(msg) => write!(f, "Failed to send request: {}", msg),
        }
    }
}

impl std::error::Error for ConnectionError {}
