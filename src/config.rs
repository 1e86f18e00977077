//! Application configuration.
//!
//! Centralizes all configuration constants used throughout the application.

// =============================================================================
// Application Metadata
// =============================================================================

/// Application name shown in the header.
pub const APP_NAME: &str = "msgview";

/// Application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Locale used when the browser does not report one.
pub const DEFAULT_LOCALE: &str = "zh-CN";

// =============================================================================
// Network Configuration
// =============================================================================

/// Chat history feed, relative to the page.
pub const MESSAGES_URL: &str = "messages.json";

/// History feed request deadline in milliseconds.
pub const FEED_TIMEOUT_MS: u32 = 10000;

/// Messaging connection endpoint.
pub const SOCKET_URL: &str = "ws://127.0.0.1:6700";

/// Schemes card links may open with. Protocol-relative links (`//host`)
/// are allowed as well.
pub const ALLOWED_LINK_SCHEMES: &[&str] = &["http", "https"];

// =============================================================================
// Notices
// =============================================================================

/// How long a notice stays on screen, in milliseconds.
pub const NOTICE_LIFETIME_MS: u32 = 4000;

/// Maximum notices shown at once. Older ones are dropped first.
pub const MAX_NOTICES: usize = 4;
