//! Localized strings used by the renderer and click router.
//!
//! The real translation service belongs to the host application; this
//! module only defines the lookup seam and a small built-in table so the
//! renderer always has something to show.

/// Message keys looked up through a [`Localizer`].
pub mod keys {
    /// Label for XML cards this client cannot draw.
    pub const XML_UNSUPPORTED: &str = "chat_xml_unsupport";
    /// Notice shown when a forward bundle is too large to fetch.
    pub const FORWARD_TOO_MANY: &str = "pop_chat_forward_toooomany";
}

/// Lookup of user-facing strings by key.
pub trait Localizer {
    /// Text for `key`. Unknown keys should come back as the key itself.
    fn text(&self, key: &str) -> String;
}

/// Languages with a built-in table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    ZhCn,
    En,
}

impl Locale {
    /// Pick a locale from a BCP 47 tag such as `navigator.language`.
    ///
    /// Anything starting with `en` is English; everything else falls back
    /// to Simplified Chinese.
    pub fn from_tag(tag: &str) -> Self {
        if tag.to_ascii_lowercase().starts_with("en") {
            Self::En
        } else {
            Self::ZhCn
        }
    }
}

const ZH_CN: &[(&str, &str)] = &[
    (keys::XML_UNSUPPORTED, "不支持的卡片消息"),
    (keys::FORWARD_TOO_MANY, "合并转发消息过多，无法获取"),
];

const EN: &[(&str, &str)] = &[
    (keys::XML_UNSUPPORTED, "Unsupported card message"),
    (
        keys::FORWARD_TOO_MANY,
        "This forwarded conversation is too large to load",
    ),
];

/// [`Localizer`] backed by the built-in tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinLocalizer {
    locale: Locale,
}

impl BuiltinLocalizer {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Localizer for BuiltinLocalizer {
    fn text(&self, key: &str) -> String {
        let table = match self.locale {
            Locale::ZhCn => ZH_CN,
            Locale::En => EN,
        };
        table
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}
