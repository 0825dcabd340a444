//! Error types for catalog fetches.

use thiserror::Error;

/// Errors a catalog source can fail with.
///
/// The feed engine treats every variant as an opaque cause and carries it in
/// `ViewState::Failed`. Variants hold plain messages so states stay `Clone`
/// and comparable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, reset).
    #[error("network error: {0}")]
    Network(String),

    /// The response body could not be decoded.
    #[error("decoding error: {0}")]
    Decoding(String),

    /// The catalog answered with a non-success status.
    #[error("catalog API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Any other failure of the fetch operation.
    #[error("fetch failed: {0}")]
    Other(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return FetchError::Decoding(err.to_string());
        }
        FetchError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decoding(err.to_string())
    }
}
