//! Data models for the chat view.
//!
//! - [`message`] - Chat messages and row layout
//! - [`notice`] - Toast notices

mod message;
mod notice;

pub use message::{ChatMessage, SegmentRow, layout_rows};
pub use notice::{Notice, dismiss, push_capped};
