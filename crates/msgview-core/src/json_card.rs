//! JSON app share card rendering.
//!
//! Payload shape:
//!
//! ```text
//! { "desc": "..", "prompt": "..",
//!   "meta": { "<app>": { "title", "desc", "tag", "icon", "source_icon",
//!                        "preview", "qqdocurl", "jumpUrl" } } }
//! ```

use serde_json::Value;
use tracing::debug;

use crate::descriptor::{ATTR_URL, CardDescriptor, RenderedCard};
use crate::error::CardError;
use crate::sanitize::sanitize;

/// Element id prefix for JSON cards.
pub const JSON_ID_PREFIX: &str = "json-";
/// Container class for JSON cards.
pub const JSON_CLASS: &str = "msg-json";
/// Top-level `desc` of group announcements.
pub const ANNOUNCEMENT_DESC: &str = "群公告";

/// Display fields resolved from the payload.
#[derive(Debug, Default, PartialEq)]
struct AppCard {
    name: Option<String>,
    icon: Option<String>,
    title: Option<String>,
    desc: Option<String>,
    preview: Option<String>,
    url: Option<String>,
}

fn field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

impl AppCard {
    fn resolve(json: &Value) -> Result<Self, CardError> {
        let body = json
            .get("meta")
            .and_then(Value::as_object)
            .and_then(|meta| meta.values().next())
            .ok_or_else(|| CardError::MalformedPayload("missing meta object".to_string()))?;

        let owned = |s: &str| s.to_string();
        let mut card = Self {
            name: field(body, "tag").or_else(|| field(body, "title")).map(owned),
            icon: field(body, "icon")
                .or_else(|| field(body, "source_icon"))
                .map(owned),
            title: field(body, "title").map(owned),
            desc: field(body, "desc").map(owned),
            preview: field(body, "preview").map(normalize_preview),
            url: field(body, "qqdocurl")
                .or_else(|| field(body, "jumpUrl"))
                .map(owned),
        };

        if field(json, "desc") == Some(ANNOUNCEMENT_DESC) {
            debug!("json card is a group announcement");
            card.title = Some(ANNOUNCEMENT_DESC.to_string());
            card.desc = field(json, "prompt").map(owned);
            card.preview = None;
            card.icon = Some(String::new());
            card.name = Some(ANNOUNCEMENT_DESC.to_string());
        }

        Ok(card)
    }
}

/// Previews without a scheme are made protocol-relative.
fn normalize_preview(preview: &str) -> String {
    if preview.contains("http") {
        preview.to_string()
    } else {
        format!("//{}", preview)
    }
}

fn text(value: &Option<String>) -> String {
    value.as_deref().map(sanitize).unwrap_or_default()
}

fn attr(value: &str) -> String {
    htmlescape::encode_minimal(value)
}

/// Render a JSON card from its raw payload string.
pub fn build_json(data: &str, message_id: &str) -> Result<RenderedCard, CardError> {
    let json: Value = serde_json::from_str(data).inspect_err(|err| {
        debug!(message_id, %err, "json card payload is not valid json");
    })?;
    build_json_value(&json, message_id)
}

/// Render a JSON card from an already decoded payload.
pub fn build_json_value(json: &Value, message_id: &str) -> Result<RenderedCard, CardError> {
    let card = AppCard::resolve(json)?;
    let element_id = format!("{}{}", JSON_ID_PREFIX, message_id);

    let mut html = format!("<div class=\"{}\" id=\"{}\"", JSON_CLASS, attr(&element_id));
    if let Some(url) = card.url.as_deref() {
        html.push_str(&format!(" {}=\"{}\"", ATTR_URL, attr(url)));
    }
    html.push('>');
    html.push_str(&format!("<p>{}</p>", text(&card.title)));
    html.push_str(&format!("<span>{}</span>", text(&card.desc)));
    match card.preview.as_deref() {
        Some(preview) => html.push_str(&format!("<img src=\"{}\">", attr(preview))),
        None => html.push_str("<img style=\"display:none\">"),
    }
    html.push_str(&format!(
        "<div><img src=\"{}\"><span>{}</span></div>",
        attr(card.icon.as_deref().unwrap_or_default()),
        text(&card.name)
    ));
    html.push_str("</div>");

    let descriptor = card
        .url
        .as_deref()
        .map(CardDescriptor::link)
        .unwrap_or_default();

    Ok(RenderedCard {
        element_id: Some(element_id),
        html,
        descriptor,
    })
}
