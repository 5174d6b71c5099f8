//! Compiled-in module registry
//!
//! The daemon builds a [`ModuleRegistry`] from every module it was compiled
//! with, picks one by configured name, and initializes it once. The result is
//! an [`ActiveModule`] handle that the lifecycle passes to every connection.

use crate::error::{PtsError, Result};
use crate::traits::{PtsModule, Resolution};
use crate::types::Identity;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Name-indexed set of available backend modules
#[derive(Default)]
pub struct ModuleRegistry {
    modules: BTreeMap<&'static str, Box<dyn PtsModule>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. A later module with the same name replaces the earlier one.
    pub fn register(&mut self, module: Box<dyn PtsModule>) -> &mut Self {
        let name = module.name();
        if self.modules.insert(name, module).is_some() {
            warn!(module = name, "PTS module registered twice, keeping the last one");
        }
        self
    }

    /// Builder-style [`ModuleRegistry::register`]
    pub fn with(mut self, module: Box<dyn PtsModule>) -> Self {
        self.register(module);
        self
    }

    /// Registered module names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.modules.keys().copied().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Take the module with the given name out of the registry
    pub fn select(mut self, name: &str) -> Result<Box<dyn PtsModule>> {
        self.modules
            .remove(name)
            .ok_or_else(|| PtsError::UnsupportedModule(name.to_string()))
    }

    /// Select a module by name and run its one-time initialization
    pub async fn activate(self, name: &str) -> Result<ActiveModule> {
        let module = self.select(name)?;
        ActiveModule::initialize(module).await
    }
}

/// The selected, initialized module shared by all connections
#[derive(Clone)]
pub struct ActiveModule {
    module: Arc<dyn PtsModule>,
}

impl ActiveModule {
    /// Run the module's init and freeze it for shared use
    pub async fn initialize(mut module: Box<dyn PtsModule>) -> Result<Self> {
        module.init().await?;
        info!(module = module.name(), "PTS module initialized");
        Ok(Self {
            module: Arc::from(module),
        })
    }

    pub fn name(&self) -> &'static str {
        self.module.name()
    }

    pub async fn resolve(&self, identity: &Identity) -> Resolution {
        self.module.make_authstate(identity).await
    }
}

impl std::fmt::Debug for ActiveModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveModule")
            .field("name", &self.name())
            .finish()
    }
}
