//! ptloader daemon library
//!
//! Wires the module registry, the authorization cache and the connection
//! handler into a Unix socket service.

pub mod client;
pub mod config;
pub mod error;
pub mod exitcodes;
pub mod handler;
pub mod lifecycle;
pub mod server;

pub use config::LoaderConfig;
pub use error::{LoaderError, Result};
pub use handler::ConnectionHandler;
pub use lifecycle::Ptloader;
pub use server::{PtsServer, ServeMode};
