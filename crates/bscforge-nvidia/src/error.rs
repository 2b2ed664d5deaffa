//! Error types for hosted API operations.

use thiserror::Error;

/// Errors that can occur when calling the hosted endpoints.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection error - unable to reach the API host.
    #[error("Connection error: unable to reach {host}")]
    Connection { host: String },

    /// Request timeout.
    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// API returned an error response. A 401 here usually means the
    /// API key is missing or invalid.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The stream failed mid-generation; partial output is discarded.
    #[error("Stream failed: {0}")]
    Stream(String),

    /// HTTP request error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for hosted API operations.
pub type ApiResult<T> = Result<T, ApiError>;
