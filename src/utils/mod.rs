//! Utility modules for web and DOM operations.
//!
//! Provides:
//! - [`dom`] - Window, document and element helpers
//! - [`validate_link_url`] - Link validation before opening card targets

pub mod dom;
mod url;

pub use url::{UrlValidation, validate_link_url};
