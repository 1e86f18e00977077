//! Click handling for rendered cards.
//!
//! The UI records each card's [`CardDescriptor`] in a [`CardRegistry`] when
//! it inserts the HTML, then hands clicks to [`CardClickRouter::on_click`].
//! Side effects go through three collaborator traits so the router itself
//! stays free of browser APIs.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::connect::ForwardRequest;
use crate::descriptor::{CardDescriptor, ClickAction};
use crate::i18n::{Localizer, keys};

// =============================================================================
// Collaborators
// =============================================================================

/// Opens links.
pub trait Navigator {
    /// Open `url` in a new browsing context.
    fn open(&self, url: &str);
}

/// Issues requests to the messaging connection.
///
/// Fire and forget: the reply is handled elsewhere.
pub trait ForwardResolver {
    fn request_forward(&self, request: &ForwardRequest);
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// User-facing notices.
pub trait Notifier {
    fn notify(&self, severity: Severity, text: &str);
}

// =============================================================================
// CardRegistry
// =============================================================================

/// Descriptors of rendered cards, keyed by element id.
#[derive(Debug, Clone, Default)]
pub struct CardRegistry {
    cards: HashMap<String, CardDescriptor>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, element_id: impl Into<String>, descriptor: CardDescriptor) {
        self.cards.insert(element_id.into(), descriptor);
    }

    pub fn get(&self, element_id: &str) -> Option<&CardDescriptor> {
        self.cards.get(element_id)
    }

    pub fn clear(&mut self) {
        self.cards.clear();
    }
}

// =============================================================================
// CardClickRouter
// =============================================================================

/// Routes card clicks to the right collaborator.
pub struct CardClickRouter<'a> {
    navigator: &'a dyn Navigator,
    forwarder: &'a dyn ForwardResolver,
    notifier: &'a dyn Notifier,
    i18n: &'a dyn Localizer,
}

impl<'a> CardClickRouter<'a> {
    pub fn new(
        navigator: &'a dyn Navigator,
        forwarder: &'a dyn ForwardResolver,
        notifier: &'a dyn Notifier,
        i18n: &'a dyn Localizer,
    ) -> Self {
        Self {
            navigator,
            forwarder,
            notifier,
            i18n,
        }
    }

    /// Handle a click on the card rendered as `element_id`.
    ///
    /// The registry is consulted first; cards missing from it are rebuilt
    /// from their rendered attributes via `attribute`.
    pub fn on_click<F>(&self, registry: &CardRegistry, element_id: &str, attribute: F) -> ClickAction
    where
        F: Fn(&str) -> Option<String>,
    {
        let descriptor = match registry.get(element_id) {
            Some(descriptor) => descriptor.clone(),
            None => {
                debug!(element_id, "card not in registry, reading attributes");
                CardDescriptor::from_attributes(attribute)
            }
        };
        self.dispatch(&descriptor)
    }

    /// Carry out the click behavior of `descriptor` and report what was done.
    ///
    /// A link always wins; forward resolution only happens for cards
    /// without one.
    pub fn dispatch(&self, descriptor: &CardDescriptor) -> ClickAction {
        let action = descriptor.click_action();
        match &action {
            ClickAction::Open(url) => self.navigator.open(url),
            ClickAction::ResolveForward(resid) => {
                self.forwarder.request_forward(&ForwardRequest::forward(resid.as_str()));
            }
            ClickAction::ForwardTooLarge => {
                warn!("forward bundle cannot be resolved");
                self.notifier
                    .notify(Severity::Error, &self.i18n.text(keys::FORWARD_TOO_MANY));
            }
            ClickAction::Ignore => {}
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{BuiltinLocalizer, Locale};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        opened: RefCell<Vec<String>>,
        forwards: RefCell<Vec<ForwardRequest>>,
        notices: RefCell<Vec<(Severity, String)>>,
    }

    impl Navigator for Recorder {
        fn open(&self, url: &str) {
            self.opened.borrow_mut().push(url.to_string());
        }
    }

    impl ForwardResolver for Recorder {
        fn request_forward(&self, request: &ForwardRequest) {
            self.forwards.borrow_mut().push(request.clone());
        }
    }

    impl Notifier for Recorder {
        fn notify(&self, severity: Severity, text: &str) {
            self.notices.borrow_mut().push((severity, text.to_string()));
        }
    }

    fn no_attrs(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_link_opens() {
        let rec = Recorder::default();
        let i18n = BuiltinLocalizer::new(Locale::En);
        let router = CardClickRouter::new(&rec, &rec, &rec, &i18n);
        let mut registry = CardRegistry::new();
        registry.insert("json-1", CardDescriptor::link("https://a"));

        router.on_click(&registry, "json-1", no_attrs);
        assert_eq!(*rec.opened.borrow(), vec!["https://a".to_string()]);
        assert!(rec.forwards.borrow().is_empty());
    }

    #[test]
    fn test_url_beats_forward() {
        let rec = Recorder::default();
        let i18n = BuiltinLocalizer::new(Locale::En);
        let router = CardClickRouter::new(&rec, &rec, &rec, &i18n);
        let mut card = CardDescriptor::forward(Some("42"));
        card.attach_url("https://a");

        let action = router.dispatch(&card);
        assert_eq!(action, ClickAction::Open("https://a".into()));
        assert_eq!(rec.opened.borrow().len(), 1);
        assert!(rec.forwards.borrow().is_empty());
    }

    #[test]
    fn test_forward_requested() {
        let rec = Recorder::default();
        let i18n = BuiltinLocalizer::new(Locale::En);
        let router = CardClickRouter::new(&rec, &rec, &rec, &i18n);

        router.dispatch(&CardDescriptor::forward(Some("42")));
        assert_eq!(*rec.forwards.borrow(), vec![ForwardRequest::forward("42")]);
        assert!(rec.notices.borrow().is_empty());
    }

    #[test]
    fn test_forward_sentinel_notifies() {
        let rec = Recorder::default();
        let i18n = BuiltinLocalizer::new(Locale::En);
        let router = CardClickRouter::new(&rec, &rec, &rec, &i18n);

        let action = router.dispatch(&CardDescriptor::forward(None));
        assert_eq!(action, ClickAction::ForwardTooLarge);
        assert!(rec.forwards.borrow().is_empty());
        assert_eq!(
            *rec.notices.borrow(),
            vec![(
                Severity::Error,
                "This forwarded conversation is too large to load".to_string()
            )]
        );
    }

    #[test]
    fn test_plain_and_unsupported_do_nothing() {
        let rec = Recorder::default();
        let i18n = BuiltinLocalizer::new(Locale::En);
        let router = CardClickRouter::new(&rec, &rec, &rec, &i18n);

        for card in [CardDescriptor::plain(), CardDescriptor::unsupported()] {
            assert_eq!(router.dispatch(&card), ClickAction::Ignore);
        }
        assert!(rec.opened.borrow().is_empty());
        assert!(rec.forwards.borrow().is_empty());
        assert!(rec.notices.borrow().is_empty());
    }

    #[test]
    fn test_falls_back_to_attributes() {
        let rec = Recorder::default();
        let i18n = BuiltinLocalizer::new(Locale::En);
        let router = CardClickRouter::new(&rec, &rec, &rec, &i18n);
        let registry = CardRegistry::new();

        let action = router.on_click(&registry, "xml-9", |name| match name {
            "data-type" => Some("forward".to_string()),
            "data-id" => Some("77".to_string()),
            _ => None,
        });
        assert_eq!(action, ClickAction::ResolveForward("77".into()));
    }

    #[test]
    fn test_registry_ops() {
        let mut registry = CardRegistry::new();
        assert!(registry.get("a").is_none());
        registry.insert("a", CardDescriptor::plain());
        registry.insert("b", CardDescriptor::link("https://b"));
        registry.insert("a", CardDescriptor::forward(Some("7")));
        assert_eq!(registry.get("a"), Some(&CardDescriptor::forward(Some("7"))));
        assert_eq!(registry.get("b"), Some(&CardDescriptor::link("https://b")));
        registry.clear();
        assert!(registry.get("a").is_none());
        assert!(registry.get("b").is_none());
    }
}
