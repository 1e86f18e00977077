//! Plain text and card markup sanitization.

use std::collections::{HashMap, HashSet};

/// Elements a rich card body may contain after rewriting.
const CARD_TAGS: [&str; 8] = ["div", "p", "a", "img", "source", "hr", "span", "br"];

/// Attributes allowed on any card element. `data-*` is allowed by prefix.
const CARD_ATTRIBUTES: [&str; 8] = [
    "id", "class", "style", "layout", "color", "maxlines", "linespace", "hidden",
];

/// Prepare free-form message text for insertion as HTML.
///
/// Steps run in a fixed order:
/// 1. `\r\n` and lone `\r` become `\n`
/// 2. every `&` becomes `&amp;`
/// 3. the result goes through `ammonia`, which drops scripts and unsafe
///    attributes but keeps benign inline markup such as links
///
/// Escaping `&` before the filter means entity-looking text (`&lt;script&gt;`)
/// is shown literally and never decoded into live markup.
pub fn sanitize(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.replace('&', "&amp;");
    ammonia::clean(&text)
}

/// Filter rendered XML card markup down to the elements and attributes a
/// card uses.
///
/// Scripts, event handlers and unknown tags are removed. `href` is not
/// allowed at all since card links are driven by `data-url`, and image
/// sources keep only `http`, `https` or scheme-relative URLs.
pub fn sanitize_card(html: &str) -> String {
    ammonia::Builder::empty()
        .tags(HashSet::from(CARD_TAGS))
        .clean_content_tags(HashSet::from(["script", "style"]))
        .generic_attributes(HashSet::from(CARD_ATTRIBUTES))
        .generic_attribute_prefixes(HashSet::from(["data-"]))
        .tag_attributes(HashMap::from([("img", HashSet::from(["src", "alt"]))]))
        .url_schemes(HashSet::from(["http", "https"]))
        .url_relative(ammonia::UrlRelative::PassThrough)
        .link_rel(None)
        .clean(html)
        .to_string()
}
