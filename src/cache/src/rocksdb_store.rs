//! RocksDB-backed cache

use crate::config::CacheBackend;
use crate::error::{CacheError, Result};
use crate::AuthCache;
use rocksdb::{Options, WriteOptions, DB};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

/// Cache stored in a single-column-family RocksDB database
pub struct RocksDbCache {
    db: DB,
    path: PathBuf,
    flush_on_write: bool,
    closed: AtomicBool,
}

impl RocksDbCache {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P, flush_on_write: bool) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_max_open_files(256);

        let db = DB::open(&opts, &path).map_err(|e| CacheError::open(path.display(), e))?;

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
}

impl AuthCache for RocksDbCache {
    fn backend(&self) -> CacheBackend {
        CacheBackend::RocksDb
    }

    fn upsert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }

        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.flush_on_write);

        self.db
            .put_opt(key, value, &write_opts)
            .map_err(|e| CacheError::Write(e.to_string()))
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.db
            .get(key)
            .map_err(|e| CacheError::Read(e.to_string()))
    }

    fn len(&self) -> usize {
        self.db
            .property_int_value("rocksdb.estimate-num-keys")
            .ok()
            .flatten()
            .unwrap_or(0) as usize
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.db
            .flush()
            .map_err(|e| CacheError::Close(e.to_string()))
    }
}
