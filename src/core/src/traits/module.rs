//! Backend module trait

use crate::error::Result;
use crate::types::{AuthorizationState, Identity};
use async_trait::async_trait;

/// Outcome of resolving one identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Group memberships were resolved and should be cached
    Resolved(AuthorizationState),
    /// Normal negative result; the message is the reply sent to the caller
    Failed(String),
}

impl Resolution {
    pub fn failed<S: Into<String>>(reply: S) -> Self {
        Resolution::Failed(reply.into())
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

/// A named group resolver compiled into the daemon
///
/// Selected once at startup by [`PtsModule::name`]. `init` runs exactly once
/// before the first request; after that the module is shared read-only
/// across requests.
#[async_trait]
pub trait PtsModule: Send + Sync {
    /// Name matched against the configured module
    fn name(&self) -> &'static str;

    /// One-time initialization. An error here is fatal at startup.
    async fn init(&mut self) -> Result<()>;

    /// Resolve an identity to its authorization state
    async fn make_authstate(&self, identity: &Identity) -> Resolution;
}
