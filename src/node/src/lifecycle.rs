//! Loader startup and shutdown
//!
//! Startup establishes, in order: an unprivileged effective user, an open
//! cache, and an initialized module. Any failure there is fatal and no
//! connection is ever accepted. Shutdown closes the cache once.

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::handler::ConnectionHandler;
use crate::server::{PtsServer, ServeMode};
use ptloader_backends::builtin_registry;
use ptloader_cache::SharedCache;
use ptloader_core::{ActiveModule, ModuleRegistry};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

/// Refuse to run with superuser privileges
pub fn ensure_unprivileged(euid: u32) -> Result<()> {
    if euid == 0 {
        return Err(LoaderError::Privileged);
    }
    Ok(())
}

/// A started loader: open cache plus active module
pub struct Ptloader {
    config: LoaderConfig,
    cache: SharedCache,
    module: ActiveModule,
}

impl Ptloader {
    /// Start with the compiled-in module set
    pub async fn start(config: LoaderConfig) -> Result<Self> {
        let registry = builtin_registry(&config.modules);
        Self::start_with_registry(config, registry).await
    }

    /// Start with an explicit module set
    pub async fn start_with_registry(config: LoaderConfig, registry: ModuleRegistry) -> Result<Self> {
        config.validate()?;

        let cache_path = config.cache_path();
        let cache = ptloader_cache::open(&config.cache, &cache_path).map_err(|e| {
            error!(path = %cache_path.display(), error = %e, "DBERROR: opening pts cache");
            LoaderError::CacheOpen(e)
        })?;

        let module = match registry.activate(&config.ptloader.module).await {
            Ok(module) => module,
            Err(e) => {
                Self::close_cache(&cache);
                return Err(e.into());
            }
        };

        info!(
            module = module.name(),
            cache = %cache_path.display(),
            "ptloader ready"
        );

        Ok(Self {
            config,
            cache,
            module,
        })
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn module(&self) -> &ActiveModule {
        &self.module
    }

    /// Connection handler sharing this loader's module and cache
    pub fn handler(&self) -> ConnectionHandler {
        ConnectionHandler::new(self.module.clone(), Arc::clone(&self.cache))
            .with_debug(self.config.debug_enabled())
    }

    /// Bind the configured socket and serve until `shutdown` completes.
    ///
    /// A connection task that panicked is reported as an internal error once
    /// serving has stopped.
    pub async fn serve<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let server = PtsServer::bind(
            &self.config.socket_path(),
            Arc::new(self.handler()),
            ServeMode::from_flag(self.config.ptloader.concurrent),
        )?
        .with_drain_timeout(self.config.drain_timeout());
        match server.run(shutdown).await {
            0 => Ok(()),
            failed => Err(LoaderError::Internal(format!(
                "{} connection task(s) panicked",
                failed
            ))),
        }
    }

    /// Close the cache. Errors are logged, not retried.
    pub fn shutdown(&self) {
        Self::close_cache(&self.cache);
        info!("ptloader stopped");
    }

    fn close_cache(cache: &SharedCache) {
        if let Err(e) = cache.close() {
            error!(error = %e, "DBERROR: error closing pts cache");
        }
    }
}
