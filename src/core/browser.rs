//! Browser implementations of the card click collaborators.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use msgview_core::connect::ForwardRequest;
use msgview_core::{ForwardResolver, Navigator, Notifier, Severity};
use wasm_bindgen_futures::spawn_local;

use super::connection;
use crate::config::{MAX_NOTICES, NOTICE_LIFETIME_MS};
use crate::models::{Notice, dismiss, push_capped};
use crate::utils::dom::{console_warn, open_in_new_tab};
use crate::utils::{UrlValidation, validate_link_url};

/// Opens validated links in a new tab.
pub struct TabNavigator;

impl Navigator for TabNavigator {
    fn open(&self, url: &str) {
        match validate_link_url(url) {
            UrlValidation::Valid(url) => {
                if !open_in_new_tab(&url) {
                    console_warn(&format!("Could not open {}", url));
                }
            }
            UrlValidation::Invalid(err) => {
                console_warn(&format!("Blocked card link '{}': {}", url, err));
            }
        }
    }
}

/// Sends forward requests over the messaging connection.
pub struct SocketForwarder;

impl ForwardResolver for SocketForwarder {
    fn request_forward(&self, request: &ForwardRequest) {
        if let Err(err) = connection::send_request(request) {
            console_warn(&format!(
                "Forward request for {} not sent: {}",
                request.params.resid, err
            ));
        }
    }
}

/// Shows notices as toasts that dismiss themselves.
#[derive(Clone, Copy)]
pub struct ToastNotifier {
    notices: RwSignal<Vec<Notice>>,
}

impl ToastNotifier {
    pub fn new(notices: RwSignal<Vec<Notice>>) -> Self {
        Self { notices }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, severity: Severity, text: &str) {
        let notice = Notice::new(severity, text);
        let id = notice.id;
        self.notices.update(|n| push_capped(n, notice, MAX_NOTICES));

        let notices = self.notices;
        spawn_local(async move {
            TimeoutFuture::new(NOTICE_LIFETIME_MS).await;
            notices.update(|n| dismiss(n, id));
        });
    }
}
