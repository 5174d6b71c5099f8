//! Shared fixtures for the loader integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use ptloader_cache::{AuthCache, CacheBackend, CacheError, MemoryCache, SharedCache};
use ptloader_core::{
    ActiveModule, AuthorizationState, Identity, ModuleRegistry, PtsModule, Resolution,
};
use ptloader_node::ConnectionHandler;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncWrite, DuplexStream, ReadBuf};

/// Module stub that records every identity it is asked about.
///
/// `ghost` fails with "no such principal"; everything else resolves to a
/// 12-byte state derived from the identity length.
#[derive(Clone, Default)]
pub struct RecordingModule {
    pub calls: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl RecordingModule {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn state_for(identity: &[u8]) -> Vec<u8> {
        let mut state = vec![0x5Au8; 12];
        state[0] = identity.len() as u8;
        state
    }
}

#[async_trait]
impl PtsModule for RecordingModule {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn init(&mut self) -> ptloader_core::Result<()> {
        Ok(())
    }

    async fn make_authstate(&self, identity: &Identity) -> Resolution {
        self.calls.lock().unwrap().push(identity.as_bytes().to_vec());
        if identity.as_bytes() == b"ghost" {
            return Resolution::failed("no such principal");
        }
        Resolution::Resolved(AuthorizationState::new(Self::state_for(identity.as_bytes())))
    }
}

pub async fn activate(module: RecordingModule) -> ActiveModule {
    ModuleRegistry::new()
        .with(Box::new(module))
        .activate("recording")
        .await
        .unwrap()
}

/// Handler over a recording module and an in-memory cache
pub async fn memory_handler() -> (ConnectionHandler, RecordingModule, Arc<MemoryCache>) {
    let module = RecordingModule::default();
    let cache = Arc::new(MemoryCache::new());
    let handler = ConnectionHandler::new(activate(module.clone()).await, cache.clone());
    (handler, module, cache)
}

/// Cache whose writes always fail
#[derive(Default)]
pub struct FailingCache {
    pub attempts: AtomicUsize,
}

impl AuthCache for FailingCache {
    fn backend(&self) -> CacheBackend {
        CacheBackend::Memory
    }

    fn upsert(&self, _key: &[u8], _value: &[u8]) -> ptloader_cache::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Write("disk full".to_string()))
    }

    fn get(&self, _key: &[u8]) -> ptloader_cache::Result<Option<Vec<u8>>> {
        Ok(None)
    }

    fn len(&self) -> usize {
        0
    }

    fn close(&self) -> ptloader_cache::Result<()> {
        Ok(())
    }
}

pub fn shared(cache: Arc<FailingCache>) -> SharedCache {
    cache
}

/// Stream wrapper that counts shutdowns and drops
pub struct CountingStream<S = DuplexStream> {
    inner: S,
    pub shutdowns: Arc<AtomicUsize>,
    pub drops: Arc<AtomicUsize>,
}

impl<S> CountingStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            shutdowns: Arc::new(AtomicUsize::new(0)),
            drops: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<S: AsyncRead + Unpin> AsyncRead for CountingStream<S> {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for CountingStream<S> {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let result = Pin::new(&mut self.inner).poll_shutdown(cx);
        if result.is_ready() {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

impl<S> Drop for CountingStream<S> {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}
