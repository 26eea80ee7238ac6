//! Bounded connection pool for blocking drivers.
//!
//! A semaphore caps the number of connections checked out at once; idle
//! connections are kept in a stack and reused. A [`PooledConnection`] goes
//! back to the pool when dropped unless it was marked broken.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

/// Opens new connections for a [`Pool`]. `connect` blocks and is run on the
/// blocking thread pool.
pub trait ConnectionManager: Send + Sync + 'static {
    /// The connection type.
    type Connection: Send + 'static;
    /// The error raised when a connection cannot be opened.
    type Error: std::fmt::Display + Send + 'static;

    /// Opens a connection.
    fn connect(&self) -> Result<Self::Connection, Self::Error>;
}

/// Pool acquisition errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Every connection stayed checked out for the whole acquisition timeout.
    #[error("no connection available after {0:?}")]
    Exhausted(Duration),

    /// Opening a new connection failed.
    #[error("failed to open connection: {0}")]
    Connect(String),

    /// The pool was closed.
    #[error("pool closed")]
    Closed,
}

struct Inner<M: ConnectionManager> {
    manager: M,
    idle: Mutex<Vec<M::Connection>>,
    permits: Arc<Semaphore>,
    max_size: usize,
    acquire_timeout: Duration,
}

impl<M: ConnectionManager> Inner<M> {
    fn idle(&self) -> std::sync::MutexGuard<'_, Vec<M::Connection>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A bounded pool of connections opened by `M`.
pub struct Pool<M: ConnectionManager> {
    inner: Arc<Inner<M>>,
}

impl<M: ConnectionManager> Clone for Pool<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: ConnectionManager> Pool<M> {
    /// Creates an empty pool. Connections are opened lazily.
    #[must_use]
    pub fn new(manager: M, max_size: usize, acquire_timeout: Duration) -> Self {
        let max_size = max_size.max(1);
        Self {
            inner: Arc::new(Inner {
                manager,
                idle: Mutex::new(Vec::with_capacity(max_size)),
                permits: Arc::new(Semaphore::new(max_size)),
                max_size,
                acquire_timeout,
            }),
        }
    }

    /// Checks out a connection, reusing an idle one when possible.
    ///
    /// # Errors
    ///
    /// `PoolError::Exhausted` when no slot frees up within the acquisition
    /// timeout, `PoolError::Connect` when a new connection cannot be opened.
    pub async fn acquire(&self) -> Result<PooledConnection<M>, PoolError> {
        let permit = tokio::time::timeout(
            self.inner.acquire_timeout,
            Arc::clone(&self.inner.permits).acquire_owned(),
        )
        .await
        .map_err(|_| PoolError::Exhausted(self.inner.acquire_timeout))?
        .map_err(|_| PoolError::Closed)?;

        let reused = self.inner.idle().pop();
        let conn = match reused {
            Some(conn) => conn,
            None => {
                let inner = Arc::clone(&self.inner);
                let conn = tokio::task::spawn_blocking(move || inner.manager.connect())
                    .await
                    .map_err(|e| PoolError::Connect(format!("connect task failed: {e}")))?
                    .map_err(|e| PoolError::Connect(e.to_string()))?;
                debug!(max_size = self.inner.max_size, "Opened new pooled connection");
                conn
            }
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
            broken: false,
            _permit: permit,
        })
    }

    /// Number of idle connections.
    #[must_use]
    pub fn idle_count(&self) -> usize {
        self.inner.idle().len()
    }

    /// Number of connections that could be checked out right now.
    #[must_use]
    pub fn available(&self) -> usize {
        self.inner.permits.available_permits()
    }

    /// Configured maximum size.
    #[must_use]
    pub fn max_size(&self) -> usize {
        self.inner.max_size
    }
}

/// A checked-out connection.
pub struct PooledConnection<M: ConnectionManager> {
    conn: Option<M::Connection>,
    pool: Arc<Inner<M>>,
    broken: bool,
    _permit: OwnedSemaphorePermit,
}

impl<M: ConnectionManager> PooledConnection<M> {
    /// Discards the connection on drop instead of returning it.
    pub fn mark_broken(&mut self) {
        self.broken = true;
    }
}

impl<M: ConnectionManager> Deref for PooledConnection<M> {
    type Target = M::Connection;

    fn deref(&self) -> &Self::Target {
        // Only `Drop` takes the connection out.
        self.conn.as_ref().unwrap_or_else(|| unreachable!())
    }
}

impl<M: ConnectionManager> DerefMut for PooledConnection<M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().unwrap_or_else(|| unreachable!())
    }
}

impl<M: ConnectionManager> Drop for PooledConnection<M> {
    fn drop(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        if self.broken {
            warn!("Discarding broken pooled connection");
            return;
        }
        self.pool.idle().push(conn);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct CountingManager {
        opened: AtomicUsize,
        fail: bool,
    }

    impl ConnectionManager for CountingManager {
        type Connection = usize;
        type Error = String;

        fn connect(&self) -> Result<usize, String> {
            if self.fail {
                return Err("login failed".to_string());
            }
            Ok(self.opened.fetch_add(1, Ordering::SeqCst))
        }
    }

    fn pool(max: usize) -> Pool<CountingManager> {
        Pool::new(CountingManager::default(), max, Duration::from_millis(50))
    }

    #[tokio::test]
    async fn test_connection_is_reused_after_drop() {
        let pool = pool(2);

        let first = *pool.acquire().await.unwrap();
        assert_eq!(pool.idle_count(), 1);

        let second = pool.acquire().await.unwrap();
        assert_eq!(*second, first);
        assert_eq!(pool.inner.manager.opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_pool_times_out() {
        let pool = pool(1);
        let _held = pool.acquire().await.unwrap();

        let err = pool.acquire().await.err().unwrap();

        assert_eq!(err, PoolError::Exhausted(Duration::from_millis(50)));
        assert_eq!(pool.available(), 0);
    }

    #[tokio::test]
    async fn test_slot_frees_on_drop() {
        let pool = pool(1);
        {
            let _held = pool.acquire().await.unwrap();
            assert_eq!(pool.available(), 0);
        }
        assert_eq!(pool.available(), 1);
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_broken_connection_is_discarded() {
        let pool = pool(1);
        {
            let mut conn = pool.acquire().await.unwrap();
            conn.mark_broken();
        }
        assert_eq!(pool.idle_count(), 0);
        assert_eq!(pool.available(), 1);

        let fresh = pool.acquire().await.unwrap();
        assert_eq!(*fresh, 1);
    }

    #[tokio::test]
    async fn test_connect_failure_releases_slot() {
        let pool = Pool::new(
            CountingManager {
                fail: true,
                ..CountingManager::default()
            },
            1,
            Duration::from_millis(50),
        );

        let err = pool.acquire().await.err().unwrap();

        assert_eq!(err, PoolError::Connect("login failed".to_string()));
        assert_eq!(pool.available(), 1);
    }

    #[tokio::test]
    async fn test_zero_size_is_clamped() {
        assert_eq!(pool(0).max_size(), 1);
    }
}
