//! sled-backed cache

use crate::config::CacheBackend;
use crate::error::{CacheError, Result};
use crate::AuthCache;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Cache stored in an embedded sled database
pub struct SledCache {
    db: sled::Db,
    path: PathBuf,
    flush_on_write: bool,
    closed: AtomicBool,
}

impl SledCache {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P, flush_on_write: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let db = sled::Config::new()
            .path(&path)
            .open()
            .map_err(|e| CacheError::open(path.display(), e))?;

        Ok(Self {
            db,
            path,
            flush_on_write,
            closed: AtomicBool::new(false),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        Ok(())
    }
}

impl AuthCache for SledCache {
    fn backend(&self) -> CacheBackend {
        CacheBackend::Sled
    }

    fn upsert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.ensure_open()?;

        self.db
            .insert(key, value)
            .map_err(|e| CacheError::Write(e.to_string()))?;

        if self.flush_on_write {
            self.db
                .flush()
                .map_err(|e| CacheError::Write(format!("flush: {}", e)))?;
        }

        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;

        self.db
            .get(key)
            .map(|value| value.map(|v| v.to_vec()))
            .map_err(|e| CacheError::Read(e.to_string()))
    }

    fn len(&self) -> usize {
        self.db.len()
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        let flushed = self
            .db
            .flush()
            .map_err(|e| CacheError::Close(e.to_string()))?;
        debug!(path = %self.path.display(), bytes = flushed, "flushed pts cache");
        Ok(())
    }
}
