//! XML rich card rendering.
//!
//! Payload shape:
//!
//! ```text
//! <?xml ...?><msg serviceID=".." m_resid=".." url=".."><item layout="..">
//!   <title size="34">..</title><summary>..</summary><picture cover=".."/>
//! </item><source name=".." icon=".."/></msg>
//! ```
//!
//! The `<item>` body and its siblings are rewritten into HTML by
//! [`BODY_RULES`], wrapped in a `<div id="xml-{message_id}">` and returned.
//! The `<msg>` header is parsed separately only to read the forward resid
//! and link; it is never part of the output.

use tracing::{debug, warn};

use crate::descriptor::{
    ATTR_ID, ATTR_NAME, ATTR_RESID, ATTR_SIZE, ATTR_TYPE, ATTR_URL, CardDescriptor, FORWARD_TYPE,
    RenderedCard,
};
use crate::error::CardError;
use crate::i18n::{Localizer, keys};
use crate::markup::{Fragment, NodeId};
use crate::rules::{BODY_RULES, HEADER_RULES};
use crate::sanitize::sanitize_card;

/// Element id prefix for XML cards.
pub const XML_ID_PREFIX: &str = "xml-";
/// `<source name>` of merged-forward bundles ("chat history").
pub const FORWARD_SOURCE: &str = "聊天记录";
/// `<source name>` of group polls, which are not drawn.
pub const POLL_SOURCE: &str = "群投票";
/// Class of the placeholder shown for unsupported subtypes.
pub const UNSUPPORTED_CLASS: &str = "msg-unknow";

const CLICKABLE_CURSOR: &str = "pointer";

/// Envelope attributes read from the `<msg>` header.
struct Header {
    resid: Option<String>,
    url: Option<String>,
}

/// Render an XML card.
///
/// `id` is the segment's own id (kept as `data-id` unless the card is a
/// forward), `message_id` names the root element (`xml-{message_id}`).
///
/// Known subtypes this client cannot draw come back as a short placeholder
/// with an `Unsupported` descriptor.
pub fn build_xml(
    xml: &str,
    id: &str,
    message_id: &str,
    i18n: &dyn Localizer,
) -> Result<RenderedCard, CardError> {
    let body_start = xml.find("<item").ok_or(CardError::MissingEnvelope)?;
    let body_end = xml
        .find("</msg>")
        .filter(|end| *end >= body_start)
        .ok_or(CardError::MissingEnvelope)?;

    let body = BODY_RULES.apply(&xml[body_start..body_end]);
    let element_id = format!("{}{}", XML_ID_PREFIX, message_id);

    let mut card = Fragment::parse_in("div", &body);
    let root = card.root();
    card.set_attribute(root, "id", &element_id);
    card.set_attribute(root, ATTR_ID, id);
    scale_titles(&mut card);

    let header = parse_header(xml, body_start);

    let source = card
        .children_by_tag(root, "source")
        .last()
        .and_then(|node| card.attribute(node, ATTR_NAME))
        .map(str::to_string);
    if source.is_none() {
        debug!(message_id, "xml card has no source label");
    }

    let mut descriptor = CardDescriptor::plain();
    match source.as_deref() {
        Some(FORWARD_SOURCE) => {
            descriptor = CardDescriptor::forward(header.resid.as_deref());
            card.set_attribute(root, ATTR_TYPE, FORWARD_TYPE);
            card.set_attribute(root, ATTR_ID, descriptor.target_id().unwrap_or_default());
        }
        Some(POLL_SOURCE) => {
            debug!(message_id, "group poll card rendered as placeholder");
            return Ok(unsupported(POLL_SOURCE, i18n));
        }
        _ => {}
    }

    if let Some(url) = header.url.filter(|url| !url.is_empty()) {
        descriptor.attach_url(&url);
        card.set_attribute(root, ATTR_URL, &url);
    }
    if descriptor.is_clickable() {
        card.set_style(root, "cursor", CLICKABLE_CURSOR);
    }

    Ok(RenderedCard {
        element_id: Some(element_id),
        html: sanitize_card(&card.outer_html(root)),
        descriptor,
    })
}

/// Size titles from their `data-size` point value.
///
/// Applies to `<p>` children of the card body container: font size is
/// `size / 30` rem and bottom margin `size / 5` px. Titles without a numeric
/// size are left unstyled.
fn scale_titles(card: &mut Fragment) {
    let Some(container) = card.first_element_child(card.root()) else {
        return;
    };
    let titles: Vec<NodeId> = card.children_by_tag(container, "p").collect();
    for title in titles {
        let Some(size) = card
            .attribute(title, ATTR_SIZE)
            .and_then(|size| size.trim().parse::<f64>().ok())
            .filter(|size| size.is_finite())
        else {
            continue;
        };
        card.set_style(title, "font-size", &format!("{}rem", size / 30.0));
        card.set_style(title, "margin-bottom", &format!("{}px", size / 5.0));
    }
}

/// Read `m_resid` and `url` off the `<msg>` header preceding the body.
fn parse_header(xml: &str, body_start: usize) -> Header {
    let header_start = xml[..body_start].find("<msg").unwrap_or(0);
    let markup = HEADER_RULES.apply(&format!("{}</msg>", &xml[header_start..body_start]));
    let header = Fragment::parse_in("div", &markup);

    let Some(envelope) = header.first_element_child(header.root()) else {
        warn!("xml card header has no envelope element");
        return Header {
            resid: None,
            url: None,
        };
    };
    Header {
        resid: header.attribute(envelope, ATTR_RESID).map(str::to_string),
        url: header.attribute(envelope, ATTR_URL).map(str::to_string),
    }
}

fn unsupported(source: &str, i18n: &dyn Localizer) -> RenderedCard {
    let label = i18n.text(keys::XML_UNSUPPORTED);
    RenderedCard {
        element_id: None,
        html: format!(
            "<a class=\"{}\">（{}：{}）</a>",
            UNSUPPORTED_CLASS,
            htmlescape::encode_minimal(&label),
            htmlescape::encode_minimal(source)
        ),
        descriptor: CardDescriptor::unsupported(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{CardKind, ClickAction, FORWARD_SENTINEL};
    use crate::i18n::{BuiltinLocalizer, Locale};

    fn en() -> BuiltinLocalizer {
        BuiltinLocalizer::new(Locale::En)
    }

    fn card(header: &str, source: &str) -> String {
        format!(
            "<?xml version='1.0' encoding='UTF-8' standalone='yes' ?>\
             <msg serviceID=\"35\" templateID=\"1\" action=\"viewMultiMsg\" {}>\
             <item layout=\"1\"><title size=\"34\">Group chat history</title>\
             <title size=\"26\" color=\"#777777\">alice: hi</title>\
             <summary size=\"26\">View 2 messages</summary></item>\
             <source name=\"{}\"/></msg>",
            header, source
        )
    }

    #[test]
    fn test_forward_card() {
        let out = build_xml(&card(r#"m_resid="42""#, FORWARD_SOURCE), "35", "m1", &en()).unwrap();
        assert_eq!(out.element_id.as_deref(), Some("xml-m1"));
        assert_eq!(out.descriptor.kind(), CardKind::Forward);
        assert_eq!(out.descriptor.target_id(), Some("42"));
        assert!(out.html.starts_with(
            r#"<div id="xml-m1" data-id="42" data-type="forward" style="cursor: pointer;">"#
        ));
    }

    #[test]
    fn test_forward_card_without_resid() {
        let out = build_xml(&card("", FORWARD_SOURCE), "35", "m1", &en()).unwrap();
        assert_eq!(out.descriptor.target_id(), Some(FORWARD_SENTINEL));
        assert_eq!(out.descriptor.click_action(), ClickAction::ForwardTooLarge);
        assert!(out.html.contains(r#"data-id="undefined""#));
    }

    #[test]
    fn test_body_markup() {
        let out = build_xml(&card("", "news"), "35", "m2", &en()).unwrap();
        assert!(out.html.contains(r#"<div class="msg-xml" layout="1">"#));
        assert!(out.html.contains(
            r#"<p data-size="34" style="font-size: 1.1333333333333333rem; margin-bottom: 6.8px;">Group chat history</p>"#
        ));
        assert!(out.html.contains(
            r#"<a class="msg-xml-summary" data-size="26">View 2 messages</a>"#
        ));
        assert!(out.html.contains(r#"<source data-name="news">"#));
        assert!(out.html.ends_with("</div>"));
    }

    #[test]
    fn test_plain_card_keeps_source_id() {
        let out = build_xml(&card("", "news"), "35", "m2", &en()).unwrap();
        assert_eq!(out.descriptor, CardDescriptor::plain());
        assert!(out.html.starts_with(r#"<div id="xml-m2" data-id="35">"#));
        assert!(!out.html.contains("cursor"));
    }

    #[test]
    fn test_poll_is_unsupported() {
        let out = build_xml(&card(r#"url="https://x""#, POLL_SOURCE), "35", "m3", &en()).unwrap();
        assert_eq!(out.element_id, None);
        assert_eq!(out.descriptor.kind(), CardKind::Unsupported);
        assert_eq!(
            out.html,
            r#"<a class="msg-unknow">（Unsupported card message：群投票）</a>"#
        );
    }

    #[test]
    fn test_link_card() {
        let out = build_xml(&card(r#"url="https://example.com/a?b=1&amp;c=2""#, "news"), "35", "m4", &en())
            .unwrap();
        assert_eq!(out.descriptor.kind(), CardKind::Link);
        assert_eq!(
            out.descriptor.target_url(),
            Some("https://example.com/a?b=1&c=2")
        );
        assert!(out.html.contains(r#"data-url="https://example.com/a?b=1&amp;c=2""#));
        assert!(out.html.contains("cursor: pointer;"));
    }

    #[test]
    fn test_forward_card_with_link_keeps_both() {
        let out = build_xml(
            &card(r#"m_resid="42" url="https://example.com""#, FORWARD_SOURCE),
            "35",
            "m5",
            &en(),
        )
        .unwrap();
        assert_eq!(out.descriptor.kind(), CardKind::Forward);
        assert_eq!(out.descriptor.target_id(), Some("42"));
        assert_eq!(
            out.descriptor.click_action(),
            ClickAction::Open("https://example.com".into())
        );
        assert_eq!(out.html.matches("cursor: pointer;").count(), 1);
    }

    #[test]
    fn test_empty_url_ignored() {
        let out = build_xml(&card(r#"url="""#, "news"), "35", "m6", &en()).unwrap();
        assert_eq!(out.descriptor.kind(), CardKind::Plain);
        assert!(!out.html.contains("data-url"));
    }

    #[test]
    fn test_missing_source_is_plain() {
        let xml = r#"<msg m_resid="1"><item><title>t</title></item></msg>"#;
        let out = build_xml(xml, "1", "m7", &en()).unwrap();
        assert_eq!(out.descriptor, CardDescriptor::plain());
    }

    #[test]
    fn test_title_without_size_unstyled() {
        let xml = r#"<msg><item><title>t</title></item><source name="x"/></msg>"#;
        let out = build_xml(xml, "1", "m8", &en()).unwrap();
        assert!(out.html.contains("<p>t</p>"));
    }

    #[test]
    fn test_picture_cover() {
        let xml = r#"<msg><item><picture cover="https://img/a.png"/></item><source name="x"/></msg>"#;
        let out = build_xml(xml, "1", "m9", &en()).unwrap();
        assert!(out.html.contains(r#"<img class="msg-xml-img" src="https://img/a.png">"#));
    }

    #[test]
    fn test_missing_envelope() {
        assert_eq!(
            build_xml("<msg></msg>", "1", "m", &en()),
            Err(CardError::MissingEnvelope)
        );
        assert_eq!(
            build_xml("<msg><item>", "1", "m", &en()),
            Err(CardError::MissingEnvelope)
        );
    }

    #[test]
    fn test_hostile_body_is_filtered() {
        let xml = r#"<msg><item><title>t</title><picture cover="x" onerror="alert(1)"/><summary href="javascript:alert(2)">s</summary><script>alert(3)</script></item><source name="news"/></msg>"#;
        let out = build_xml(xml, "1", "m11", &en()).unwrap();
        assert!(!out.html.contains("onerror"));
        assert!(!out.html.contains("javascript:"));
        assert!(!out.html.contains("<script"));
        assert!(!out.html.contains("alert"));
        assert!(out.html.contains(r#"<img class="msg-xml-img" src="x">"#));
        assert!(out.html.contains(r#"<a class="msg-xml-summary">s</a>"#));
        assert!(out.html.contains(r#"<source data-name="news">"#));
    }

    #[test]
    fn test_header_not_in_output() {
        let xml = r#"<msg url="javascript:alert(1)"><item><title>t</title></item><source name="x"/></msg>"#;
        let out = build_xml(xml, "1", "m10", &en()).unwrap();
        // The link is recorded as-is; the front end refuses non-http schemes
        assert_eq!(out.descriptor.target_url(), Some("javascript:alert(1)"));
        assert!(!out.html.contains("<msg"));
    }
}
