//! Chat history feed loading.
//!
//! The feed is a JSON array of messages served next to the page. Entries
//! that do not decode as a [`ChatMessage`] are skipped and counted so one
//! malformed record does not hide the whole history.

use gloo_timers::callback::Timeout;
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, DomException, Request, RequestInit, RequestMode, Response};

use crate::config::FEED_TIMEOUT_MS;
use crate::core::error::FeedError;
use crate::models::ChatMessage;

/// Decoded history feed.
#[derive(Debug, Default, PartialEq)]
pub struct Feed {
    /// Messages in feed order
    pub messages: Vec<ChatMessage>,
    /// Entries that were not valid messages
    pub skipped: usize,
}

/// Fetch and decode the history feed at `url`.
///
/// The request is aborted after `FEED_TIMEOUT_MS`.
pub async fn load(url: &str) -> Result<Feed, FeedError> {
    let text = fetch_text(url).await?;
    parse(&text)
}

/// Decode a feed body.
pub fn parse(text: &str) -> Result<Feed, FeedError> {
    let entries = match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(entries)) => entries,
        Ok(_) => return Err(FeedError::NotAList),
        Err(e) => return Err(FeedError::Malformed(e.to_string())),
    };

    let mut feed = Feed::default();
    for entry in entries {
        match serde_json::from_value::<ChatMessage>(entry) {
            Ok(message) => feed.messages.push(message),
            Err(_) => feed.skipped += 1,
        }
    }
    Ok(feed)
}

async fn fetch_text(url: &str) -> Result<String, FeedError> {
    let window = web_sys::window().ok_or(FeedError::NoWindow)?;
    let controller = AbortController::new().map_err(|e| FeedError::Request(describe(&e)))?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::SameOrigin);
    opts.set_signal(Some(&controller.signal()));
    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|e| FeedError::Request(describe(&e)))?;

    // Dropping the timer on return cancels it
    let _deadline = Timeout::new(FEED_TIMEOUT_MS, move || controller.abort());

    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(rejection)?
        .dyn_into()
        .map_err(|_| FeedError::Body)?;
    if !response.ok() {
        return Err(FeedError::Status(response.status()));
    }

    let body = response.text().map_err(|_| FeedError::Body)?;
    JsFuture::from(body)
        .await
        .map_err(rejection)?
        .as_string()
        .ok_or(FeedError::Body)
}

/// Map a rejected fetch or body read. Aborts only come from the deadline.
fn rejection(err: JsValue) -> FeedError {
    match err.dyn_ref::<DomException>() {
        Some(e) if e.name() == "AbortError" => FeedError::Timeout,
        _ => FeedError::Network(describe(&err)),
    }
}

fn describe(err: &JsValue) -> String {
    err.dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| err.as_string())
        .unwrap_or_else(|| "unknown error".to_string())
}
