//! Link validation for card clicks.
//!
//! Card payloads come from other users, so only web links are opened.

use crate::config::ALLOWED_LINK_SCHEMES;

/// Result of URL validation
#[derive(Debug, Clone, PartialEq)]
pub enum UrlValidation {
    /// URL is safe to open
    Valid(String),
    /// URL is rejected
    Invalid(UrlValidationError),
}

/// Errors that can occur during URL validation.
#[derive(Debug, Clone, PartialEq)]
pub enum UrlValidationError {
    /// URL is empty
    Empty,
    /// URL has a scheme outside the allowed list
    SchemeNotAllowed(String),
    /// URL has neither a scheme nor a `//` prefix
    Relative,
    /// URL has no host
    NoHost,
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "URL is empty"),
            Self::SchemeNotAllowed(scheme) => write!(f, "Scheme '{}' is not allowed", scheme),
            Self::Relative => write!(f, "URL is relative"),
            Self::NoHost => write!(f, "URL has no host"),
        }
    }
}

/// Validate a card link before opening it.
///
/// Checks:
/// 1. URL is not empty
/// 2. URL is protocol-relative or uses an allowed scheme
/// 3. URL has a host
pub fn validate_link_url(url: &str) -> UrlValidation {
    let url = url.trim();

    if url.is_empty() {
        return UrlValidation::Invalid(UrlValidationError::Empty);
    }

    let rest = if let Some(rest) = url.strip_prefix("//") {
        rest
    } else {
        let Some((scheme, rest)) = url.split_once(':') else {
            return UrlValidation::Invalid(UrlValidationError::Relative);
        };
        let scheme = scheme.to_lowercase();
        if !ALLOWED_LINK_SCHEMES.contains(&scheme.as_str()) {
            return UrlValidation::Invalid(UrlValidationError::SchemeNotAllowed(scheme));
        }
        let Some(rest) = rest.strip_prefix("//") else {
            return UrlValidation::Invalid(UrlValidationError::NoHost);
        };
        rest
    };

    // Host is everything up to the first path, query or fragment delimiter
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
    if host.is_empty() {
        return UrlValidation::Invalid(UrlValidationError::NoHost);
    }

    UrlValidation::Valid(url.to_string())
}
