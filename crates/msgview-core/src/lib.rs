//! Message body rendering for the chat client.
//!
//! Turns decoded message segments into HTML fragments that are safe to
//! insert into the document:
//!
//! - [`sanitize`] - plain text escaping and HTML filtering
//! - [`sanitize_card`] - allow-list filter for rendered XML cards
//! - [`is_inline`] - inline/block layout decision per segment type
//! - [`build_xml`] - rich XML cards (`<msg><item>...</item></msg>`)
//! - [`build_json`] - JSON app share cards
//! - [`render_segment`] - dispatch a whole [`MessageSegment`]
//! - [`CardClickRouter`] - click handling for rendered cards

pub mod connect;
pub mod descriptor;
pub mod error;
pub mod i18n;
mod inline;
mod json_card;
pub mod markup;
mod router;
mod rules;
mod sanitize;
mod segment;
mod xml_card;

pub use descriptor::{CardDescriptor, CardKind, ClickAction, RenderedCard};
pub use error::CardError;
pub use i18n::{BuiltinLocalizer, Locale, Localizer};
pub use inline::is_inline;
pub use json_card::{build_json, build_json_value};
pub use router::{CardClickRouter, CardRegistry, ForwardResolver, Navigator, Notifier, Severity};
pub use sanitize::{sanitize, sanitize_card};
pub use segment::{MessageSegment, Payload, Rendered, render_segment};
pub use xml_card::build_xml;
