//! Error taxonomy for remote API calls.
//!
//! ERROR HANDLING
//! ==============
//! Every client call returns `Result<_, ApiError>`. Pages render
//! `err.to_string()` inline; nothing here is fatal to the app. The session
//! store never propagates these: verification failures collapse into a
//! cleared session instead.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Failure of a remote API call or of the client configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (offline, CORS, DNS).
    #[error("network error: {0}")]
    Transport(String),

    /// The server rejected the credential or the bearer token.
    #[error("{0}")]
    Unauthorized(String),

    /// Form input was rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-success status and a readable message.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// A success response body could not be decoded.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// The API base URL is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The call needs a browser and was issued from a non-browser build.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// Map a non-success status plus extracted message into the taxonomy.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Unauthorized(message),
            _ => Self::Remote { status, message },
        }
    }

    /// Whether the failure means the bearer token or credentials are no good.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
