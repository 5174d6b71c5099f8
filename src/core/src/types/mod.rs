//! Request-scoped value types

pub mod identity;
pub mod state;

pub use identity::Identity;
pub use state::AuthorizationState;
