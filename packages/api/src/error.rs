//! Error type for every [`crate::ApiClient`] call.

use thiserror::Error;

/// Fallback shown when the server gives no usable explanation.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    /// No bearer token is stored; the message says what the user tried to do.
    #[error("{0}")]
    Unauthenticated(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A 2xx body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL cannot carry the request path.
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Text suitable for a toast: the server's own message when it sent one,
    /// otherwise something generic.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthenticated(msg) => msg.clone(),
            ApiError::Server { message, .. } => message.clone(),
            ApiError::Network(_) | ApiError::Decode(_) | ApiError::InvalidUrl(_) => {
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the caller should be sent to the login page.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthenticated(_)) || self.status() == Some(401)
    }

    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }
}

/// Pull a human-readable message out of an error body.
///
/// JSON bodies are searched for `message`, `error` and `errorMessage` in that
/// order; other bodies are used verbatim. Blank results fall back to
/// [`GENERIC_ERROR_MESSAGE`].
pub fn error_message_from_body(is_json: bool, body: &str) -> String {
    let found = if is_json {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                ["message", "error", "errorMessage"].iter().find_map(|key| {
                    value
                        .get(key)
                        .and_then(|v| v.as_str())
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                })
            })
    } else {
        Some(body.trim().to_string()).filter(|s| !s.is_empty())
    };
    found.unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}
