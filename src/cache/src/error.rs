//! Error types for the authorization cache

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CacheError>;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("opening {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("write error: {0}")]
    Write(String),

    #[error("read error: {0}")]
    Read(String),

    #[error("error closing cache: {0}")]
    Close(String),

    #[error("cache is closed")]
    Closed,

    #[error("unsupported cache backend: {0}")]
    UnsupportedBackend(String),
}

impl CacheError {
    pub fn open<P: std::fmt::Display, R: std::fmt::Display>(path: P, reason: R) -> Self {
        CacheError::Open {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}
