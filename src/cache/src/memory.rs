//! In-process cache

use crate::config::CacheBackend;
use crate::error::{CacheError, Result};
use crate::AuthCache;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cache held in a concurrent map; nothing reaches disk
#[derive(Default)]
pub struct MemoryCache {
    records: DashMap<Vec<u8>, Vec<u8>>,
    closed: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthCache for MemoryCache {
    fn backend(&self) -> CacheBackend {
        CacheBackend::Memory
    }

    fn upsert(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Closed);
        }
        self.records.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.records.get(key).map(|entry| entry.value().clone()))
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
