//! Per-connection request handling
//!
//! One connection carries one request. The handler reads the length field,
//! validates it, reads the identity, asks the active module for its
//! authorization state, writes a successful result to the cache and sends
//! a single textual reply. The stream is shut down and dropped on every
//! path, exactly once.

use ptloader_cache::SharedCache;
use ptloader_core::protocol::{decode_size, validate_size};
use ptloader_core::{ActiveModule, AuthorizationState, Identity, Reply, Resolution, SIZE_FIELD_LEN};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, warn};

/// Serves single-request connections against one module and one cache
pub struct ConnectionHandler {
    module: ActiveModule,
    cache: SharedCache,
    debug: bool,
}

impl ConnectionHandler {
    pub fn new(module: ActiveModule, cache: SharedCache) -> Self {
        Self {
            module,
            cache,
            debug: false,
        }
    }

    /// Log every identity and its cache id at debug level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Serve one connection to completion and close it.
    ///
    /// Returns the reply that was sent, for logging and tests.
    pub async fn handle<S>(&self, mut stream: S) -> Reply
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let reply = self.process(&mut stream).await;

        // write_all retries short writes until the reply is out or the
        // socket fails hard
        if let Err(e) = stream.write_all(reply.as_bytes()).await {
            warn!(error = %e, "failed to send reply");
        } else if let Err(e) = stream.flush().await {
            warn!(error = %e, "failed to flush reply");
        }

        if let Err(e) = stream.shutdown().await {
            debug!(error = %e, "error closing connection");
        }
        drop(stream);

        reply
    }

    async fn process<S>(&self, stream: &mut S) -> Reply
    where
        S: AsyncRead + Unpin,
    {
        let mut field = [0u8; SIZE_FIELD_LEN];
        if let Err(e) = stream.read_exact(&mut field).await {
            error!(error = %e, "socket (size)");
            return Reply::ReadSize;
        }

        let size = match validate_size(decode_size(field)) {
            Ok(size) => size,
            Err(e) => {
                error!(error = %e, "rejecting request");
                return Reply::from(e);
            }
        };

        let mut buf = vec![0u8; size];
        if let Err(e) = stream.read_exact(&mut buf).await {
            error!(size, error = %e, "socket (user)");
            return Reply::ReadUser;
        }

        let identity = match Identity::new(buf) {
            Ok(identity) => identity,
            Err(e) => return Reply::from(e),
        };

        if self.debug {
            debug!(user = %identity, cacheid = %identity.cache_id(), "resolving");
        }

        match self.module.resolve(&identity).await {
            Resolution::Resolved(state) => {
                self.store(&identity, &state);
                Reply::Ok
            }
            Resolution::Failed(reply) => {
                debug!(user = %identity, module = self.module.name(), reply = %reply, "resolution failed");
                Reply::Module(reply)
            }
        }
    }

    /// Write the state to the cache. Failures are logged and never change
    /// the reply.
    fn store(&self, identity: &Identity, state: &AuthorizationState) {
        match self.cache.upsert(identity.as_bytes(), state.as_bytes()) {
            Ok(()) => {
                if self.debug {
                    debug!(user = %identity, bytes = state.len(), "stored auth state");
                }
            }
            Err(e) => {
                error!(user = %identity, error = %e, "DBERROR: storing auth state");
            }
        }
    }
}
