//! Requests sent to the messaging connection.
//!
//! Requests are JSON objects carrying an action name, its params and an
//! echo tag the connection uses to route the reply.

use serde::Serialize;

/// Action that fetches the contents of a merged-forward bundle.
pub const GET_FORWARD_MSG: &str = "get_forward_msg";
/// Echo tag for forward replies.
pub const FORWARD_ECHO: &str = "getForwardMsg";

/// One action request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionRequest<P> {
    pub action: &'static str,
    pub params: P,
    pub echo: &'static str,
}

/// Params for [`GET_FORWARD_MSG`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardParams {
    pub resid: String,
}

/// Request for a forwarded bundle.
pub type ForwardRequest = ActionRequest<ForwardParams>;

impl ForwardRequest {
    pub fn forward(resid: impl Into<String>) -> Self {
        Self {
            action: GET_FORWARD_MSG,
            params: ForwardParams {
                resid: resid.into(),
            },
            echo: FORWARD_ECHO,
        }
    }
}

impl<P: Serialize> ActionRequest<P> {
    /// Encode as the JSON text frame sent over the connection.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
