//! Card metadata attached to rendered fragments.
//!
//! Each card carries a [`CardDescriptor`] twice: as `data-*` attributes on
//! the fragment's root element, and as a typed value returned next to the
//! HTML so the UI can keep it in a lookup keyed by element id.

use serde::{Deserialize, Serialize};
use tracing::debug;

// =============================================================================
// Rendered attribute names
// =============================================================================

/// Card kind (`forward` for merged-forward bundles).
pub const ATTR_TYPE: &str = "data-type";
/// Source id, replaced by the forward resid on forward cards.
pub const ATTR_ID: &str = "data-id";
/// Link opened on click.
pub const ATTR_URL: &str = "data-url";
/// Forward resid on the envelope header.
pub const ATTR_RESID: &str = "data-resid";
/// Semantic subtype label on the `<source>` tag.
pub const ATTR_NAME: &str = "data-name";
/// Point size carried over from the card format.
pub const ATTR_SIZE: &str = "data-size";
/// Line spacing carried over from the card format.
pub const ATTR_LINESPACE: &str = "data-linespace";

/// `data-type` value for forward cards.
pub const FORWARD_TYPE: &str = "forward";

/// Reserved forward target meaning "bundle too large to resolve".
///
/// Written when the envelope carries no `m_resid`.
pub const FORWARD_SENTINEL: &str = "undefined";

// =============================================================================
// CardDescriptor
// =============================================================================

/// What a card does when clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardKind {
    /// Merged-forward bundle, resolved on demand by id
    Forward,
    /// Card with a link
    Link,
    /// Known subtype this client cannot draw
    Unsupported,
    /// Nothing to do on click
    Plain,
}

/// Click metadata for one rendered card.
///
/// A `Forward` card always has a non-empty `target_id`; a `Link` card always
/// has a non-empty `target_url`. Any card may carry a URL, and the URL wins
/// on click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDescriptor {
    kind: CardKind,
    target_id: Option<String>,
    target_url: Option<String>,
}

impl CardDescriptor {
    pub fn plain() -> Self {
        Self {
            kind: CardKind::Plain,
            target_id: None,
            target_url: None,
        }
    }

    pub fn unsupported() -> Self {
        Self {
            kind: CardKind::Unsupported,
            ..Self::plain()
        }
    }

    /// A link card, or a plain one when `url` is empty.
    pub fn link(url: &str) -> Self {
        let mut descriptor = Self::plain();
        descriptor.attach_url(url);
        descriptor
    }

    /// A forward card. A missing or empty resid becomes [`FORWARD_SENTINEL`].
    pub fn forward(resid: Option<&str>) -> Self {
        let target = resid
            .filter(|id| !id.is_empty())
            .unwrap_or(FORWARD_SENTINEL);
        Self {
            kind: CardKind::Forward,
            target_id: Some(target.to_string()),
            target_url: None,
        }
    }

    /// Attach a link without changing a forward/unsupported kind.
    ///
    /// Empty URLs are ignored.
    pub fn attach_url(&mut self, url: &str) {
        if url.is_empty() {
            return;
        }
        self.target_url = Some(url.to_string());
        if self.kind == CardKind::Plain {
            self.kind = CardKind::Link;
        }
    }

    pub fn kind(&self) -> CardKind {
        self.kind
    }

    pub fn target_id(&self) -> Option<&str> {
        self.target_id.as_deref()
    }

    pub fn target_url(&self) -> Option<&str> {
        self.target_url.as_deref()
    }

    /// Whether clicking the card does anything.
    pub fn is_clickable(&self) -> bool {
        self.target_url.is_some() || self.kind == CardKind::Forward
    }

    /// Rebuild a descriptor from rendered `data-*` attributes.
    ///
    /// Used for elements whose descriptor is not in the registry.
    /// The literal string `"undefined"` counts as an absent URL.
    pub fn from_attributes<F>(attribute: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut descriptor = match attribute(ATTR_TYPE).as_deref() {
            Some(FORWARD_TYPE) => Self::forward(attribute(ATTR_ID).as_deref()),
            _ => Self::plain(),
        };
        if let Some(url) = attribute(ATTR_URL).filter(|url| url != "undefined") {
            descriptor.attach_url(&url);
        }
        descriptor
    }

    /// Decide what a click on this card should do.
    pub fn click_action(&self) -> ClickAction {
        if let Some(url) = self.target_url() {
            return ClickAction::Open(url.to_string());
        }
        match (self.kind, self.target_id()) {
            (CardKind::Forward, Some(FORWARD_SENTINEL)) | (CardKind::Forward, None) => {
                debug!("forward card has no resolvable resid");
                ClickAction::ForwardTooLarge
            }
            (CardKind::Forward, Some(id)) => ClickAction::ResolveForward(id.to_string()),
            _ => ClickAction::Ignore,
        }
    }
}

impl Default for CardDescriptor {
    fn default() -> Self {
        Self::plain()
    }
}

/// Outcome of clicking a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickAction {
    /// Open the URL in a new browsing context
    Open(String),
    /// Ask the connection to fetch the forwarded bundle
    ResolveForward(String),
    /// Forward bundle cannot be fetched; tell the user
    ForwardTooLarge,
    /// Nothing to do
    Ignore,
}

// =============================================================================
// RenderedCard
// =============================================================================

/// HTML for one card plus its click metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCard {
    /// Id of the fragment's root element; `None` for placeholders.
    pub element_id: Option<String>,
    pub html: String,
    pub descriptor: CardDescriptor,
}
