//! Persistence errors

/// Errors raised by the key-value substrate and record encoding
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("storage quota exceeded: writing {requested} bytes to '{key}' would exceed the {limit} byte limit")]
    QuotaExceeded {
        key: String,
        requested: usize,
        limit: usize,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for StoreError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        StoreError::Backend(format!("stored value is not valid UTF-8: {}", err))
    }
}
