//! Internal error types for pinekit-reqwest.

use thiserror::Error;

/// Result type alias for pinekit-reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal error type for pinekit-reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<Error> for pinekit_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if let Some(status) = e.status() {
                    pinekit_core::Error::from_status(status.as_u16(), "").with_source(e)
                } else if e.is_timeout() {
                    pinekit_core::Error::unavailable()
                        .with_message("Request timed out")
                        .with_source(e)
                } else if e.is_connect() {
                    pinekit_core::Error::unavailable()
                        .with_message("Connection failed")
                        .with_source(e)
                } else if e.is_builder() {
                    pinekit_core::Error::invalid_argument()
                        .with_message(e.to_string())
                        .with_source(e)
                } else {
                    pinekit_core::Error::unknown()
                        .with_message(e.to_string())
                        .with_source(e)
                }
            }
            Error::Serde(e) => pinekit_core::Error::unknown()
                .with_message(format!("Unexpected response body: {e}"))
                .with_source(e),
            Error::Url(e) => pinekit_core::Error::invalid_argument()
                .with_message(e.to_string())
                .with_source(e),
            Error::Config(message) => pinekit_core::Error::invalid_argument().with_message(message),
        }
    }
}
