//! Error types shared by the ptloader crates

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PtsError>;

/// Request length outside `1..MAXKEY`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("zero request size")]
    Zero,

    #[error("request size {size} is not below the key limit {max}")]
    TooLarge { size: usize, max: usize },
}

/// Module selection and state encoding errors
#[derive(Debug, Error)]
pub enum PtsError {
    /// No compiled-in module carries the configured name
    #[error("PTS module {0} not supported")]
    UnsupportedModule(String),

    /// A module failed its one-time initialization
    #[error("PTS module {module} failed to initialize: {reason}")]
    ModuleInit { module: String, reason: String },

    /// Authorization state encoding errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PtsError {
    /// Create a module initialization error
    pub fn module_init<M: Into<String>, R: Into<String>>(module: M, reason: R) -> Self {
        PtsError::ModuleInit {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        PtsError::Serialization(msg.into())
    }
}
