//! Ordered textual rewrites that turn card XML into renderable HTML.
//!
//! Rules run top to bottom over the whole input, each exactly once. Later
//! rules rely on earlier renames: the summary class is added to `<a`, which
//! only exists after `summary` became `a`.

use std::sync::LazyLock;

use regex::Regex;

use crate::descriptor::{ATTR_LINESPACE, ATTR_NAME, ATTR_RESID, ATTR_SIZE, ATTR_URL};

/// Class added to every `<div>` in a card body.
pub const BODY_CLASS: &str = "msg-xml";
/// Class added to every summary link.
pub const SUMMARY_CLASS: &str = "msg-xml-summary";
/// Class added to card pictures.
pub const IMAGE_CLASS: &str = "msg-xml-img";

/// A single `(pattern, replacement)` rewrite.
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    fn new(pattern: &str, replacement: impl Into<String>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("rewrite rule pattern must compile"),
            replacement: replacement.into(),
        }
    }
}

/// An ordered list of rewrites.
pub struct RuleSet(Vec<RewriteRule>);

impl RuleSet {
    pub fn apply(&self, input: &str) -> String {
        self.0.iter().fold(input.to_string(), |text, rule| {
            rule.pattern
                .replace_all(&text, rule.replacement.as_str())
                .into_owned()
        })
    }
}

// Tag names are matched only right after `<` or `</` and before a delimiter,
// so words like "subtitle" in text or attribute values are left alone.

/// Rewrites for the `<item>...</item>` body and any siblings up to `</msg>`.
pub static BODY_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet(vec![
        // Tags
        RewriteRule::new(r"<(/?)item([\s/>])", "<${1}div${2}"),
        RewriteRule::new(r"<div([\s/>])", format!(r#"<div class="{}"${{1}}"#, BODY_CLASS)),
        RewriteRule::new(r"<(/?)title([\s/>])", "<${1}p${2}"),
        RewriteRule::new(r"<(/?)summary([\s/>])", "<${1}a${2}"),
        RewriteRule::new(r"<a([\s/>])", format!(r#"<a class="{}"${{1}}"#, SUMMARY_CLASS)),
        RewriteRule::new(r"<picture([\s/>])", format!(r#"<img class="{}"${{1}}"#, IMAGE_CLASS)),
        // Attributes
        RewriteRule::new(r"(\s)size=", format!("${{1}}{}=", ATTR_SIZE)),
        RewriteRule::new(r"(\s)linespace=", format!("${{1}}{}=", ATTR_LINESPACE)),
        RewriteRule::new(r"(\s)cover=", "${1}src="),
        // Only the source tag's own name attribute
        RewriteRule::new(
            r"(<source\s(?:[^>]*?\s)?)name=",
            format!("${{1}}{}=", ATTR_NAME),
        ),
    ])
});

/// Rewrites for the `<msg ...>` envelope header.
pub static HEADER_RULES: LazyLock<RuleSet> = LazyLock::new(|| {
    RuleSet(vec![
        RewriteRule::new(r"<(/?)msg([\s/>])", "<${1}div${2}"),
        RewriteRule::new(r"(\s)m_resid=", format!("${{1}}{}=", ATTR_RESID)),
        RewriteRule::new(r"(\s)url=", format!("${{1}}{}=", ATTR_URL)),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_becomes_classed_div() {
        let out = BODY_RULES.apply(r#"<item layout="2"></item>"#);
        assert_eq!(out, r#"<div class="msg-xml" layout="2"></div>"#);
    }

    #[test]
    fn test_title_and_summary() {
        let out = BODY_RULES.apply(r#"<title size="34">T</title><summary>S</summary>"#);
        assert_eq!(
            out,
            r#"<p data-size="34">T</p><a class="msg-xml-summary">S</a>"#
        );
    }

    #[test]
    fn test_picture_becomes_img() {
        let out = BODY_RULES.apply(r#"<picture cover="http://x/a.png"/>"#);
        assert_eq!(out, r#"<img class="msg-xml-img" src="http://x/a.png"/>"#);
    }

    #[test]
    fn test_tag_words_in_text_untouched() {
        let out = BODY_RULES.apply("<title>subtitle item summary</title>");
        assert_eq!(out, "<p>subtitle item summary</p>");
    }

    #[test]
    fn test_other_a_prefixed_tags_untouched() {
        let out = BODY_RULES.apply("<audio src=\"x\"></audio><a>y</a>");
        assert_eq!(
            out,
            r#"<audio src="x"></audio><a class="msg-xml-summary">y</a>"#
        );
    }

    #[test]
    fn test_linespace_attribute() {
        let out = BODY_RULES.apply(r#"<summary linespace="1">s</summary>"#);
        assert_eq!(
            out,
            r#"<a class="msg-xml-summary" data-linespace="1">s</a>"#
        );
    }

    #[test]
    fn test_name_only_rewritten_on_source() {
        let out =
            BODY_RULES.apply(r#"<button name="b"></button><source icon="i" name="聊天记录"/>"#);
        assert_eq!(
            out,
            r#"<button name="b"></button><source icon="i" data-name="聊天记录"/>"#
        );
    }

    #[test]
    fn test_source_name_first_attribute() {
        let out = BODY_RULES.apply(r#"<source name="群投票" />"#);
        assert_eq!(out, r#"<source data-name="群投票" />"#);
    }

    #[test]
    fn test_header_rules() {
        let out = HEADER_RULES.apply(r#"<msg serviceID="35" m_resid="42" url="https://x"></msg>"#);
        assert_eq!(
            out,
            r#"<div serviceID="35" data-resid="42" data-url="https://x"></div>"#
        );
    }
}
