//! Browser-side services.
//!
//! - [`browser`] - Navigator, forward resolver and notifier for card clicks
//! - [`connection`] - Messaging WebSocket
//! - [`error`] - Feed and connection errors
//! - [`feed`] - History feed loading

pub mod browser;
pub mod connection;
pub mod error;
pub mod feed;

pub use browser::{SocketForwarder, TabNavigator, ToastNotifier};
