//! Fatal loader errors and their exit codes

use crate::exitcodes::{EC_CONFIG, EC_OSERR, EC_SOFTWARE, EC_TEMPFAIL, EC_USAGE};
use ptloader_cache::CacheError;
use ptloader_core::PtsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

/// Conditions that stop the loader before or instead of serving
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("must not run as root; start ptloader as the mail system user")]
    Privileged,

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Module(#[from] PtsError),

    #[error("can't read pts database: {0}")]
    CacheOpen(#[source] CacheError),

    #[error("socket {path}: {source}")]
    Socket {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl LoaderError {
    pub fn socket<P: std::fmt::Display>(path: P, source: std::io::Error) -> Self {
        LoaderError::Socket {
            path: path.to_string(),
            source,
        }
    }

    /// Exit status for this condition
    pub fn exit_code(&self) -> u8 {
        match self {
            LoaderError::Privileged => EC_USAGE,
            LoaderError::Config(_) | LoaderError::Module(_) => EC_CONFIG,
            LoaderError::CacheOpen(_) => EC_TEMPFAIL,
            LoaderError::Socket { .. } => EC_OSERR,
            LoaderError::Internal(_) => EC_SOFTWARE,
        }
    }
}

impl From<anyhow::Error> for LoaderError {
    fn from(err: anyhow::Error) -> Self {
        LoaderError::Config(format!("{:#}", err))
    }
}
