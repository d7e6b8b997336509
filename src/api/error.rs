//! Error taxonomy for backend requests.
//!
//! Every failure a page can observe maps onto one of these variants:
//! - `Unauthorized` - the token was rejected; the client has already cleared it
//! - `Api` - the backend refused the operation and sent a message for the user
//! - `Network` - the request never produced a response (offline, DNS, CORS)
//! - `Decode` - a 2xx body did not match the expected schema

use thiserror::Error;

/// Fallback shown when the backend rejects an operation without a message.
pub const GENERIC_API_MESSAGE: &str = "The operation could not be completed. Please try again.";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("session expired")]
    Unauthorized,

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build a rejection from an error-status body, extracting the backend
    /// message when one is present. A 401 maps to `Unauthorized`.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        Self::rejection(status, body)
    }

    /// As [`from_response`](Self::from_response) but without the 401 mapping.
    /// Used for anonymous requests, where a 401 means "wrong credentials"
    /// rather than "session expired".
    ///
    /// The backend wraps messages as `{"error": "..."}` (newer endpoints use
    /// `{"message": "..."}`); anything else falls back to a generic message.
    pub fn rejection(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("error")
                    .or_else(|| v.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| GENERIC_API_MESSAGE.to_string());

        ApiError::Api { status, message }
    }

    /// True when the failure is transient and a background poll should
    /// swallow it instead of surfacing anything.
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Message suitable for a toast. Business rejections surface the backend
    /// text verbatim; everything else gets a stable generic phrase.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Api { message, .. } => message.clone(),
            ApiError::Network(_) => "Could not reach the server. Check your connection.".to_string(),
            ApiError::Decode(_) => GENERIC_API_MESSAGE.to_string(),
        }
    }
}
