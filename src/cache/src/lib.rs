//! # ptloader cache
//!
//! Persistent store mapping identity bytes to serialized authorization
//! state. The loader only writes here; mail server processes read the same
//! store on their own.
//!
//! ## Backends
//!
//! - `sled` - embedded log-structured store (default)
//! - `rocksdb` - RocksDB, behind the `rocksdb-backend` feature
//! - `memory` - process-local map, for tests and dry runs
//!
//! Every backend has upsert semantics: one record per key, the last
//! completed write wins. No locking or versioning is layered on top of
//! the store's own concurrency control.

pub mod config;
pub mod error;
pub mod memory;
pub mod sled_store;

#[cfg(feature = "rocksdb-backend")]
pub mod rocksdb_store;

pub use config::{CacheBackend, CacheConfig};
pub use error::{CacheError, Result};
pub use memory::MemoryCache;
pub use sled_store::SledCache;

#[cfg(feature = "rocksdb-backend")]
pub use rocksdb_store::RocksDbCache;

use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Key-value store holding one authorization state per identity
pub trait AuthCache: Send + Sync {
    /// Which backend this is
    fn backend(&self) -> CacheBackend;

    /// Insert or overwrite the record for `key`
    fn upsert(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Fetch the record for `key`. Not used on the request path.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Number of records
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flush and release the store. Later writes fail with [`CacheError::Closed`].
    fn close(&self) -> Result<()>;
}

/// Handle shared between the lifecycle and every connection
pub type SharedCache = Arc<dyn AuthCache>;

/// Open (creating if missing) the configured backend at `path`
pub fn open(config: &CacheConfig, path: &Path) -> Result<SharedCache> {
    let cache: SharedCache = match config.backend {
        CacheBackend::Sled => Arc::new(SledCache::open(path, config.flush_on_write)?),
        CacheBackend::Memory => Arc::new(MemoryCache::new()),
        #[cfg(feature = "rocksdb-backend")]
        CacheBackend::RocksDb => Arc::new(RocksDbCache::open(path, config.flush_on_write)?),
        #[cfg(not(feature = "rocksdb-backend"))]
        CacheBackend::RocksDb => {
            return Err(CacheError::UnsupportedBackend(
                "rocksdb (built without the rocksdb-backend feature)".to_string(),
            ))
        }
    };

    info!(backend = %config.backend, path = %path.display(), "opened pts cache");
    Ok(cache)
}
