use std::time::Duration;
use thiserror::Error;

/// Failures talking to the document store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store returned {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid store URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid object id: {0:?}")]
    InvalidId(String),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    pub fn not_found(message: impl Into<String>) -> Self {
        StoreError::Api {
            status: 404,
            code: "object_not_found".to_string(),
            message: message.into(),
        }
    }
}
