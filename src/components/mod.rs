//! UI components built with Leptos.
//!
//! - [`message`] - Message list, rows and segments
//! - [`notice`] - Toast notices

pub mod message;
pub mod notice;

pub use message::MessageList;
pub use notice::NoticeStack;
