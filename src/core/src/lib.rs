//! # ptloader core
//!
//! Shared types, the backend module trait, and the module registry for the
//! ptloader group resolution daemon.
//!
//! A request carries one [`Identity`]; the selected [`PtsModule`] turns it
//! into an opaque [`AuthorizationState`] or a diagnostic reply.

pub mod error;
pub mod protocol;
pub mod registry;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PtsError, Result, SizeError};
pub use protocol::{Reply, MAXKEY, SIZE_FIELD_LEN};
pub use registry::{ActiveModule, ModuleRegistry};
pub use traits::{PtsModule, Resolution};
pub use types::{AuthorizationState, Identity};
