//! Unix socket accept loop

use crate::error::{LoaderError, Result};
use crate::handler::ConnectionHandler;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixListener;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// How accepted connections are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeMode {
    /// One connection at a time, each run to completion before the next accept
    Sequential,
    /// One task per connection; all tasks share the module and cache
    Concurrent,
}

impl ServeMode {
    pub fn from_flag(concurrent: bool) -> Self {
        if concurrent {
            ServeMode::Concurrent
        } else {
            ServeMode::Sequential
        }
    }
}

/// How long in-flight connections may run after shutdown is requested
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Listening socket bound to a handler
pub struct PtsServer {
    listener: UnixListener,
    path: PathBuf,
    handler: Arc<ConnectionHandler>,
    mode: ServeMode,
    drain_timeout: Duration,
}

impl PtsServer {
    /// Bind the socket, replacing a stale socket file and creating the
    /// parent directory
    pub fn bind(path: &Path, handler: Arc<ConnectionHandler>, mode: ServeMode) -> Result<Self> {
        if path.exists() {
            std::fs::remove_file(path).map_err(|e| LoaderError::socket(path.display(), e))?;
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| LoaderError::socket(parent.display(), e))?;
        }

        let listener = UnixListener::bind(path).map_err(|e| LoaderError::socket(path.display(), e))?;
        info!(socket = %path.display(), mode = ?mode, "listening");

        Ok(Self {
            listener,
            path: path.to_path_buf(),
            handler,
            mode,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
        })
    }

    /// Limit how long concurrent connections may keep running after shutdown
    pub fn with_drain_timeout(mut self, drain_timeout: Duration) -> Self {
        self.drain_timeout = drain_timeout;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accept connections until `shutdown` completes.
    ///
    /// A sequential connection still in progress at shutdown is dropped.
    /// Concurrent connections get up to the drain timeout to finish and are
    /// aborted after that. The socket file is removed on the way out.
    /// Returns how many connection tasks panicked.
    pub async fn run<F>(self, shutdown: F) -> usize
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut tasks = JoinSet::new();
        let mut failed = 0;

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested, no longer accepting connections");
                    break;
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined {
                        error!(error = %e, "connection task failed");
                        failed += 1;
                    }
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, _)) => match self.mode {
                        ServeMode::Sequential => {
                            let stopped = tokio::select! {
                                _ = self.handler.handle(stream) => false,
                                _ = &mut shutdown => true,
                            };
                            if stopped {
                                warn!("shutdown requested, dropping connection in progress");
                                break;
                            }
                        }
                        ServeMode::Concurrent => {
                            let handler = Arc::clone(&self.handler);
                            tasks.spawn(async move {
                                handler.handle(stream).await;
                            });
                        }
                    },
                    Err(e) => {
                        // Continue accepting other connections
                        error!(error = %e, "failed to accept connection");
                    }
                },
            }
        }

        failed += self.drain(&mut tasks).await;

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(socket = %self.path.display(), "removed socket"),
            Err(e) => warn!(socket = %self.path.display(), error = %e, "failed to remove socket"),
        }

        failed
    }

    /// Wait for in-flight tasks, aborting whatever outlives the drain timeout
    async fn drain(&self, tasks: &mut JoinSet<()>) -> usize {
        let mut failed = 0;

        let finished = tokio::time::timeout(self.drain_timeout, async {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    error!(error = %e, "connection task failed");
                    failed += 1;
                }
            }
        })
        .await;

        if finished.is_err() {
            warn!(
                remaining = tasks.len(),
                timeout_ms = self.drain_timeout.as_millis() as u64,
                "aborting connections still running after shutdown"
            );
            tasks.abort_all();
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    if e.is_panic() {
                        error!(error = %e, "connection task failed");
                        failed += 1;
                    }
                }
            }
        }

        failed
    }
}
