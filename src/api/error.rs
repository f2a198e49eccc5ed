//! Error types for the API client

use thiserror::Error;

/// Errors that can occur when calling the appointment API
#[derive(Error, Debug)]
pub enum ApiError {
    /// The server answered outside the 2xx range
    #[error("{message}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// Composed human-readable message, e.g. "HTTP 400: bad input (E1)"
        message: String,
        /// Raw response body as received
        body: String,
    },

    /// Network-level failure (DNS, connection, timeout)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body that is not valid JSON
    #[error("invalid JSON in response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// Whether this failure looks like an expired or missing session.
    ///
    /// Matches the error text, not the status code, so a transport-level
    /// failure mentioning "Unauthorized" triggers the same recovery.
    pub fn is_unauthorized(&self) -> bool {
        let text = self.to_string();
        text.contains("401") || text.contains("Unauthorized")
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
