//! Root application module.
//!
//! Contains the main App component, AppContext definition and startup
//! logic (feed fetch and messaging connection).

use leptos::prelude::*;
use msgview_core::{
    BuiltinLocalizer, CardClickRouter, CardDescriptor, CardRegistry, ClickAction, Locale,
    Notifier, Severity,
};
use wasm_bindgen_futures::spawn_local;

use crate::components::{MessageList, NoticeStack};
use crate::config::{APP_NAME, APP_VERSION, DEFAULT_LOCALE, MESSAGES_URL, SOCKET_URL};
use crate::core::{SocketForwarder, TabNavigator, ToastNotifier, connection, feed};
use crate::models::{ChatMessage, Notice};
use crate::utils::dom::{browser_language, console_warn, element_attribute, reload_page};

stylance::import_crate_style!(css, "src/app.module.css");

// ============================================================================
// FeedState
// ============================================================================

/// Loading state of the history feed.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedState {
    Loading,
    Ready,
    Failed(String),
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and accessed from children
/// with `use_context::<AppContext>()`.
///
/// # Note
///
/// This struct is `Copy` because all fields are Leptos handles or small
/// values.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Messages shown in the view, oldest first.
    pub messages: RwSignal<Vec<ChatMessage>>,
    /// History feed status.
    pub feed: RwSignal<FeedState>,
    /// Descriptors of every rendered card, keyed by element id.
    pub cards: StoredValue<CardRegistry>,
    /// Visible toasts.
    pub notices: RwSignal<Vec<Notice>>,
    /// UI string table.
    pub i18n: BuiltinLocalizer,
}

impl AppContext {
    /// Creates a new context with an empty view, using the browser's
    /// language for UI strings.
    pub fn new() -> Self {
        let tag = browser_language().unwrap_or_else(|| DEFAULT_LOCALE.to_string());
        Self {
            messages: RwSignal::new(Vec::new()),
            feed: RwSignal::new(FeedState::Loading),
            cards: StoredValue::new(CardRegistry::new()),
            notices: RwSignal::new(Vec::new()),
            i18n: BuiltinLocalizer::new(Locale::from_tag(&tag)),
        }
    }

    /// Replace the shown messages. Cards of the old messages are forgotten.
    pub fn set_messages(&self, messages: Vec<ChatMessage>) {
        self.cards.update_value(|cards| cards.clear());
        self.messages.set(messages);
    }

    /// Remember the descriptor of a card rendered as `element_id`.
    pub fn register_card(&self, element_id: &str, descriptor: CardDescriptor) {
        self.cards.update_value(|cards| cards.insert(element_id, descriptor));
    }

    /// Handle a click on the card rendered as `element_id`.
    ///
    /// Cards missing from the registry are read back from the element's
    /// data attributes.
    pub fn click_card(&self, element_id: &str) -> ClickAction {
        let notifier = ToastNotifier::new(self.notices);
        let router = CardClickRouter::new(&TabNavigator, &SocketForwarder, &notifier, &self.i18n);
        self.cards.with_value(|cards| {
            router.on_click(cards, element_id, |name| element_attribute(element_id, name))
        })
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Startup
// ============================================================================

/// Load the history feed into `ctx`.
fn load_feed(ctx: AppContext) {
    ctx.feed.set(FeedState::Loading);
    spawn_local(async move {
        match feed::load(MESSAGES_URL).await {
            Ok(feed) => {
                if feed.skipped > 0 {
                    let text = format!("{} malformed messages were skipped", feed.skipped);
                    console_warn(&text);
                    ToastNotifier::new(ctx.notices).notify(Severity::Warning, &text);
                }
                ctx.set_messages(feed.messages);
                ctx.feed.set(FeedState::Ready);
            }
            Err(err) => {
                console_warn(&format!("Failed to load {}: {}", MESSAGES_URL, err));
                ctx.feed.set(FeedState::Failed(err.to_string()));
            }
        }
    });
}

/// Root application component with error boundary.
///
/// This component:
/// - Creates and provides the global AppContext
/// - Opens the messaging connection and loads the history feed once
/// - Wraps the view in an ErrorBoundary for graceful error handling
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    if let Err(err) = connection::connect(SOCKET_URL) {
        console_warn(&err.to_string());
    }
    load_feed(ctx);

    view! {
        <ErrorBoundary fallback=|errors| view! { <ViewFailure errors=errors /> }>
            <header class=css::header>{format!("{} v{}", APP_NAME, APP_VERSION)}</header>
            {move || match ctx.feed.get() {
                FeedState::Loading => view! { <p class=css::status>"Loading…"</p> }.into_any(),
                FeedState::Failed(msg) => view! {
                    <div class=format!("{} {}", css::status, css::failed)>
                        <p>{msg}</p>
                        <button class=css::retry on:click=move |_| load_feed(ctx)>"Retry"</button>
                    </div>
                }.into_any(),
                FeedState::Ready => view! { <MessageList /> }.into_any(),
            }}
            <NoticeStack />
        </ErrorBoundary>
    }
}

fn failure_heading(count: usize) -> String {
    match count {
        0 | 1 => "Messages could not be displayed".to_string(),
        n => format!("Messages could not be displayed ({} errors)", n),
    }
}

/// Shown in place of the message view when rendering fails.
#[component]
fn ViewFailure(errors: ArcRwSignal<Errors>) -> impl IntoView {
    let counted = errors.clone();
    view! {
        <div class=css::failure>
            <p class=css::failed>
                {move || failure_heading(counted.with(|e| e.iter().count()))}
            </p>
            <ul class=css::errors>
                {move || errors.get()
                    .into_iter()
                    .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                    .collect::<Vec<_>>()
                }
            </ul>
            <button class=css::retry on:click=|_| reload_page()>"Reload"</button>
        </div>
    }
}
