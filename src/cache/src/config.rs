//! Cache configuration

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default file name joined to the configuration directory
pub const DEFAULT_FILENAME: &str = "ptscache.db";

/// Storage engine behind the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Sled,
    RocksDb,
    Memory,
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CacheBackend::Sled => "sled",
            CacheBackend::RocksDb => "rocksdb",
            CacheBackend::Memory => "memory",
        };
        f.write_str(name)
    }
}

/// `[cache]` section of the loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_backend")]
    pub backend: CacheBackend,

    /// File name under the configuration directory
    #[serde(default = "default_filename")]
    pub filename: String,

    /// Flush to disk after every upsert
    #[serde(default = "default_true")]
    pub flush_on_write: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            filename: default_filename(),
            flush_on_write: true,
        }
    }
}

fn default_backend() -> CacheBackend { CacheBackend::Sled }
fn default_filename() -> String { DEFAULT_FILENAME.to_string() }
fn default_true() -> bool { true }
