//! Loader configuration loading and validation

use anyhow::{Context, Result};
use ptloader_backends::ModulesConfig;
use ptloader_cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Complete loader configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoaderConfig {
    pub ptloader: PtloaderSection,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub modules: ModulesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PtloaderSection {
    /// Name of the backend module to load
    pub module: String,
    /// Base directory holding the cache and, by default, the socket
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,
    /// Listening socket (default `<config_dir>/socket/ptsock`)
    #[serde(default)]
    pub socket: Option<PathBuf>,
    /// Debug level; any value above zero logs every request
    #[serde(default)]
    pub debug: u8,
    /// Serve connections on separate tasks instead of one at a time
    #[serde(default)]
    pub concurrent: bool,
    /// Grace period for concurrent connections once shutdown is requested
    #[serde(default = "default_drain_timeout_ms")]
    pub drain_timeout_ms: u64,
}

fn default_config_dir() -> PathBuf { PathBuf::from("/var/lib/imap") }
fn default_drain_timeout_ms() -> u64 { 5000 }

impl LoaderConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read configuration file {}", path.as_ref().display())
        })?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration file")
    }

    /// Minimal configuration for a module, everything else defaulted
    pub fn for_module<S: Into<String>>(module: S) -> Self {
        Self {
            ptloader: PtloaderSection {
                module: module.into(),
                config_dir: default_config_dir(),
                socket: None,
                debug: 0,
                concurrent: false,
                drain_timeout_ms: default_drain_timeout_ms(),
            },
            cache: CacheConfig::default(),
            modules: ModulesConfig::default(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.ptloader.module.trim().is_empty() {
            anyhow::bail!("ptloader.module must name a PTS module");
        }

        let filename = Path::new(&self.cache.filename);
        if self.cache.filename.is_empty() || filename.components().count() != 1 || filename.is_absolute() {
            anyhow::bail!(
                "cache.filename must be a plain file name, got {:?}",
                self.cache.filename
            );
        }

        if self.ptloader.config_dir.as_os_str().is_empty() {
            anyhow::bail!("ptloader.config_dir must not be empty");
        }

        Ok(())
    }

    /// Location of the cache store
    pub fn cache_path(&self) -> PathBuf {
        self.ptloader.config_dir.join(&self.cache.filename)
    }

    /// Location of the listening socket
    pub fn socket_path(&self) -> PathBuf {
        match &self.ptloader.socket {
            Some(socket) if socket.is_absolute() => socket.clone(),
            Some(socket) => self.ptloader.config_dir.join(socket),
            None => self.ptloader.config_dir.join("socket").join("ptsock"),
        }
    }

    /// Whether every request is logged at debug level
    pub fn debug_enabled(&self) -> bool {
        self.ptloader.debug > 0
    }

    /// Default log filter when `RUST_LOG` is not set
    pub fn log_level(&self, verbose: bool) -> &'static str {
        if verbose || self.debug_enabled() {
            "debug"
        } else {
            "info"
        }
    }

    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.ptloader.drain_timeout_ms)
    }
}
