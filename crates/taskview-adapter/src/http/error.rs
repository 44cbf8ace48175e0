/*
[INPUT]:  Error sources (HTTP transport, store rejection, serialization, timeouts)
[OUTPUT]: StoreError with failure classification and retry hints
[POS]:    Error handling layer - unified error type for the task store client
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Failure reported by the task store client.
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP request failed before a response was read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Operation did not complete in time
    #[error("Store operation timed out after {duration}s")]
    Timeout { duration: u64 },

    /// Store answered with responseStatus = false
    #[error("Store rejected {operation}")]
    Rejected { operation: &'static str },

    /// Non-success HTTP status without a readable envelope
    #[error("API error (code {code}): {message}")]
    Api { code: u16, message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Envelope was accepted but the payload is unusable
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Coarse failure category used by callers to pick a reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport, timeout or unreadable response
    Network,
    /// The store understood the request and said no
    ServerRejection,
}

impl StoreError {
    /// Check if the store itself refused the operation
    pub fn is_rejection(&self) -> bool {
        matches!(self, StoreError::Rejected { .. } | StoreError::Api { .. })
    }

    pub fn category(&self) -> FailureKind {
        if self.is_rejection() {
            FailureKind::ServerRejection
        } else {
            FailureKind::Network
        }
    }

    /// Create an API error from status code and message
    pub fn api_error(status: StatusCode, message: impl Into<String>) -> Self {
        StoreError::Api {
            code: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Result type alias for task store operations
pub type Result<T> = std::result::Result<T, StoreError>;
