//! Error types for the Stratus SDK.

use thiserror::Error;

/// Result type alias for Stratus operations.
pub type Result<T> = std::result::Result<T, StratusError>;

/// Errors that can occur while talking to the Stratus platform.
#[derive(Error, Debug)]
pub enum StratusError {
    /// Malformed caller input, detected before any network call. Never retried.
    #[error("validation error: {0}")]
    Validation(String),

    /// The platform rejected the request (4xx). Never retried.
    #[error("{0}")]
    Client(ApiError),

    /// The platform failed to process the request (5xx or 429). Retried up
    /// to the configured limit before surfacing.
    #[error("{0}")]
    Server(ApiError),

    /// Connection-level failure or timeout. Retried like a server error.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StratusError {
    /// Classifies a non-2xx HTTP status into a [`StratusError`].
    ///
    /// 429 is grouped with server errors because the platform uses it for
    /// transient throttling.
    #[must_use]
    pub fn from_status(code: u16, message: String, request_id: Option<String>) -> Self {
        let err = ApiError {
            code,
            message,
            request_id,
        };
        if (400..500).contains(&code) && code != 429 {
            Self::Client(err)
        } else {
            Self::Server(err)
        }
    }

    /// Returns true if the transport layer may retry the failed request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Server(_) | Self::Transport(_))
    }

    /// Returns the HTTP status code, if this error came from a response.
    #[must_use]
    pub const fn code(&self) -> Option<u16> {
        match self {
            Self::Client(e) | Self::Server(e) => Some(e.code),
            _ => None,
        }
    }
}

/// Structured payload of a non-2xx platform response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub code: u16,
    /// Human-readable message, taken from the response body's
    /// `error.message` when present, otherwise the raw body text.
    pub message: String,
    /// Value of the `x-request-id` response header, for support tickets.
    pub request_id: Option<String>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} | code: {}", self.message, self.code)?;
        if let Some(request_id) = &self.request_id {
            write!(f, " | X-Request-ID: {request_id}")?;
        }
        Ok(())
    }
}
