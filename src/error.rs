use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during recipe extraction
#[derive(Error, Debug)]
pub enum ImportError {
    /// URL could not be parsed or does not use http(s)
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The fetch did not complete before the deadline
    #[error("Request timed out after {}ms", .0.as_millis())]
    FetchTimeout(Duration),

    /// Non-2xx response or a network-level failure
    #[error("Failed to fetch URL: {0}")]
    FetchFailed(String),

    /// Response was neither HTML nor plain text
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Response body exceeded the configured byte cap
    #[error("Response exceeded the {limit} byte limit")]
    ResponseTooLarge { limit: usize },

    /// Extraction ran but produced nothing usable
    #[error("No recipe content found: {0}")]
    NoContentFound(String),

    /// A structured-data block could not be parsed
    #[error("Malformed structured data: {0}")]
    MalformedStructuredData(String),

    /// Instagram caption/image acquisition failed
    #[error("Failed to capture post: {0}")]
    CaptureFailed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Persistence collaborator failed
    #[error("Store error: {0}")]
    StoreError(String),
}

impl ImportError {
    /// Map a reqwest failure onto the fetch taxonomy
    pub(crate) fn from_request(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ImportError::FetchTimeout(timeout)
        } else {
            ImportError::FetchFailed(err.to_string())
        }
    }
}
