//! Traits implemented by pluggable components

pub mod module;

pub use module::{PtsModule, Resolution};
