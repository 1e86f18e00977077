//! Message segments and the per-segment render dispatcher.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::descriptor::RenderedCard;
use crate::error::CardError;
use crate::i18n::Localizer;
use crate::json_card::{build_json, build_json_value};
use crate::sanitize::sanitize;
use crate::xml_card::build_xml;

/// Segment body: a bare string, or an object of named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Object(Value),
}

impl Default for Payload {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Payload {
    /// The payload itself when it is a string, otherwise its string `field`.
    pub fn text_field(&self, field: &str) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Object(value) => value.get(field).and_then(Value::as_str),
        }
    }
}

/// One piece of a chat message as produced by the message decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageSegment {
    #[serde(rename = "type")]
    pub type_tag: String,
    #[serde(default)]
    pub payload: Payload,
    #[serde(default)]
    pub segment_id: String,
}

impl MessageSegment {
    pub fn new(type_tag: impl Into<String>, payload: Payload, segment_id: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            payload,
            segment_id: segment_id.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new("text", Payload::Text(text.into()), "")
    }
}

/// Result of rendering one segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    /// Sanitized inline text
    Text(String),
    /// XML or JSON card
    Card(RenderedCard),
    /// Segment type drawn by the caller (images, faces, mentions, ...)
    Skipped,
}

/// Render the HTML for `segment` of message `message_id`.
///
/// - `text`: sanitized text (`text` field when the payload is an object)
/// - `xml`: XML card (`data` field), with the segment id as source id
/// - `json`: JSON card (`data` field, or the object itself)
/// - anything else: [`Rendered::Skipped`]
pub fn render_segment(
    segment: &MessageSegment,
    message_id: &str,
    i18n: &dyn Localizer,
) -> Result<Rendered, CardError> {
    let rendered = match segment.type_tag.as_str() {
        "text" => Rendered::Text(sanitize(segment.payload.text_field("text").unwrap_or_default())),
        "xml" => {
            let xml = segment.payload.text_field("data").unwrap_or_default();
            Rendered::Card(build_xml(xml, &segment.segment_id, message_id, i18n)?)
        }
        "json" => Rendered::Card(match &segment.payload {
            Payload::Text(data) => build_json(data, message_id)?,
            Payload::Object(value) => match value.get("data").and_then(Value::as_str) {
                Some(data) => build_json(data, message_id)?,
                None => build_json_value(value, message_id)?,
            },
        }),
        _ => Rendered::Skipped,
    };
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::CardKind;
    use crate::i18n::BuiltinLocalizer;
    use serde_json::json;

    #[test]
    fn test_deserialize_string_payload() {
        let seg: MessageSegment =
            serde_json::from_str(r#"{"type":"text","payload":"hi","segment_id":"s1"}"#).unwrap();
        assert_eq!(seg, MessageSegment::new("text", Payload::Text("hi".into()), "s1"));
    }

    #[test]
    fn test_deserialize_object_payload_and_defaults() {
        let seg: MessageSegment =
            serde_json::from_str(r#"{"type":"json","payload":{"data":"{}"}}"#).unwrap();
        assert_eq!(seg.segment_id, "");
        assert_eq!(seg.payload.text_field("data"), Some("{}"));

        let bare: MessageSegment = serde_json::from_str(r#"{"type":"face"}"#).unwrap();
        assert_eq!(bare.payload, Payload::default());
    }

    #[test]
    fn test_render_text() {
        let out = render_segment(&MessageSegment::text("a\r\nb & c"), "1", &BuiltinLocalizer::default());
        assert_eq!(out, Ok(Rendered::Text("a\nb &amp; c".to_string())));
    }

    #[test]
    fn test_render_text_object() {
        let seg = MessageSegment::new("text", Payload::Object(json!({"text": "hey"})), "");
        let out = render_segment(&seg, "1", &BuiltinLocalizer::default());
        assert_eq!(out, Ok(Rendered::Text("hey".to_string())));
    }

    #[test]
    fn test_render_xml_uses_segment_id() {
        let xml = r#"<msg><item><title>t</title></item><source name="x"/></msg>"#;
        let seg = MessageSegment::new("xml", Payload::Object(json!({ "data": xml })), "35");
        let Ok(Rendered::Card(card)) = render_segment(&seg, "7", &BuiltinLocalizer::default()) else {
            panic!("expected a card");
        };
        assert!(card.html.starts_with(r#"<div id="xml-7" data-id="35">"#));
    }

    #[test]
    fn test_render_json_object_payload() {
        let seg = MessageSegment::new(
            "json",
            Payload::Object(json!({ "meta": { "a": { "title": "T", "jumpUrl": "https://j" } } })),
            "",
        );
        let Ok(Rendered::Card(card)) = render_segment(&seg, "8", &BuiltinLocalizer::default()) else {
            panic!("expected a card");
        };
        assert_eq!(card.descriptor.kind(), CardKind::Link);
    }

    #[test]
    fn test_render_json_error_propagates() {
        let seg = MessageSegment::new("json", Payload::Text("nope".into()), "");
        assert!(matches!(
            render_segment(&seg, "1", &BuiltinLocalizer::default()),
            Err(CardError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_other_types_skipped() {
        for tag in ["image", "face", "at", "mystery"] {
            let seg = MessageSegment::new(tag, Payload::default(), "");
            assert_eq!(
                render_segment(&seg, "1", &BuiltinLocalizer::default()),
                Ok(Rendered::Skipped)
            );
        }
    }
}
