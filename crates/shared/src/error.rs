use serde::{Deserialize, Serialize};

/// Error payload returned by the backend on non-success responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    /// Message carried by `body`, or `fallback` when the body is absent,
    /// not an error object, or carries an empty message.
    pub fn message_or(body: &[u8], fallback: &str) -> String {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .map(|body| body.error)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}
