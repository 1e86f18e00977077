//! Messaging connection.
//!
//! One WebSocket per page, opened at startup. Requests are fire and forget;
//! replies are consumed by whichever view asked for them.

use std::cell::RefCell;

use msgview_core::connect::ActionRequest;
use serde::Serialize;
use web_sys::WebSocket;

use super::error::ConnectionError;

thread_local! {
    static SOCKET: RefCell<Option<WebSocket>> = const { RefCell::new(None) };
}

/// Open the connection to `url`, replacing any previous one.
pub fn connect(url: &str) -> Result<(), ConnectionError> {
    let socket = WebSocket::new(url).map_err(|_| ConnectionError::OpenFailed(url.to_string()))?;
    SOCKET.with(|slot| {
        if let Some(old) = slot.borrow_mut().replace(socket) {
            let _ = old.close();
        }
    });
    Ok(())
}

/// Send one text frame.
pub fn send_text(frame: &str) -> Result<(), ConnectionError> {
    SOCKET.with(|slot| {
        let slot = slot.borrow();
        let socket = slot.as_ref().ok_or(ConnectionError::NotConnected)?;
        let state = socket.ready_state();
        if state != WebSocket::OPEN {
            return Err(ConnectionError::NotReady(state));
        }
        socket.send_with_str(frame).map_err(|e| {
            ConnectionError::SendFailed(e.as_string().unwrap_or_else(|| "Unknown error".to_string()))
        })
    })
}

/// Encode `request` and send it.
pub fn send_request<P: Serialize>(request: &ActionRequest<P>) -> Result<(), ConnectionError> {
    let frame = request
        .to_json()
        .map_err(|e| ConnectionError::EncodeFailed(e.to_string()))?;
    send_text(&frame)
}
