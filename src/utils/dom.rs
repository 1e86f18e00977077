//! DOM and Web API utility functions.
//!
//! Provides safe, consistent access to browser APIs with proper error handling.

use web_sys::{Document, Window};

/// Get the browser window object.
#[inline]
pub fn window() -> Option<Window> {
    web_sys::window()
}

/// Get the current document.
#[inline]
pub fn document() -> Option<Document> {
    window()?.document()
}

/// Read attribute `name` of the element with `id`.
///
/// Returns `None` when the element or the attribute is missing.
pub fn element_attribute(id: &str, name: &str) -> Option<String> {
    document()?.get_element_by_id(id)?.get_attribute(name)
}

/// Open `url` in a new tab.
///
/// Returns `true` if the browser accepted the request (popup blockers may
/// still suppress the tab).
pub fn open_in_new_tab(url: &str) -> bool {
    window()
        .and_then(|w| w.open_with_url_and_target(url, "_blank").ok())
        .is_some()
}

/// Preferred UI language reported by the browser, e.g. `en-US`.
pub fn browser_language() -> Option<String> {
    window()?.navigator().language()
}

/// Reload the page, logging when the browser refuses.
pub fn reload_page() {
    let Some(window) = window() else {
        return;
    };
    if let Err(err) = window.location().reload() {
        console_warn(&format!("Page reload failed: {:?}", err));
    }
}

/// Log a warning to the browser console.
pub fn console_warn(message: &str) {
    web_sys::console::warn_1(&message.into());
}
