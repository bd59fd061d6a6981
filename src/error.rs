use thiserror::Error;

/// Errors that can leave a fetch boundary, plus the synchronous context error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {status} for {url}")]
    HttpStatus { status: u16, url: String },
    #[error("request timed out after {0}s")]
    Timeout(u64),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unknown season id {0}")]
    UnknownSeason(i64),
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Transport failures are the only kind a caller should offer a retry for.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::HttpStatus { .. } | Self::Timeout(_)
        )
    }
}

#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct StorageError {
    message: String,
}

impl StorageError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
