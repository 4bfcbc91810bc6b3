//! Bounded pool of reusable store connections
//!
//! Capacity is enforced by a semaphore with one permit per connection. A
//! [`PoolHandle`] owns both a permit and a connection; dropping it puts the
//! connection back before the permit is released, so the next waiter always
//! finds an idle connection.

use parking_lot::Mutex;
use serde::Serialize;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::error::{PoolError, StoreResult};
use crate::store::{ScoreConnection, ScoreStore};

/// Point-in-time view of pool usage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStatus {
    pub capacity: usize,
    pub in_use: usize,
    pub available: usize,
    pub acquire_timeout_ms: u64,
}

struct Shared<C> {
    idle: Mutex<Vec<C>>,
    permits: Arc<Semaphore>,
    capacity: usize,
    acquire_timeout: Duration,
    in_use: AtomicUsize,
}

/// Thread-safe, clonable handle to a fixed-capacity connection pool
pub struct ResourcePool<C> {
    shared: Arc<Shared<C>>,
}

impl<C> Clone for ResourcePool<C> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl ResourcePool<Box<dyn ScoreConnection>> {
    /// Open `capacity` connections up front and pool them
    pub async fn connect(
        store: &dyn ScoreStore,
        capacity: usize,
        acquire_timeout: Duration,
    ) -> StoreResult<Self> {
        let mut connections = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            connections.push(store.connect().await?);
        }
        debug!(
            backend = store.backend(),
            capacity, "Opened pooled store connections"
        );
        Ok(Self::from_connections(connections, acquire_timeout))
    }
}

impl<C: Send + 'static> ResourcePool<C> {
    /// Pool the given connections; capacity is their count
    pub fn from_connections(connections: Vec<C>, acquire_timeout: Duration) -> Self {
        let capacity = connections.len();
        Self {
            shared: Arc::new(Shared {
                idle: Mutex::new(connections),
                permits: Arc::new(Semaphore::new(capacity)),
                capacity,
                acquire_timeout,
                in_use: AtomicUsize::new(0),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.shared.capacity
    }

    pub fn acquire_timeout(&self) -> Duration {
        self.shared.acquire_timeout
    }

    /// Number of handles currently checked out
    pub fn in_use(&self) -> usize {
        self.shared.in_use.load(Ordering::Acquire)
    }

    pub fn available(&self) -> usize {
        self.shared.permits.available_permits()
    }

    pub fn status(&self) -> PoolStatus {
        PoolStatus {
            capacity: self.capacity(),
            in_use: self.in_use(),
            available: self.available(),
            acquire_timeout_ms: u64::try_from(self.shared.acquire_timeout.as_millis())
                .unwrap_or(u64::MAX),
        }
    }

    /// Acquire with the pool's configured timeout
    pub async fn acquire_default(&self) -> Result<PoolHandle<C>, PoolError> {
        self.acquire(self.shared.acquire_timeout).await
    }

    /// Wait up to `timeout` for a free connection
    pub async fn acquire(&self, timeout: Duration) -> Result<PoolHandle<C>, PoolError> {
        let permit =
            match tokio::time::timeout(timeout, self.shared.permits.clone().acquire_owned()).await
            {
                Ok(Ok(permit)) => permit,
                Ok(Err(_)) => return Err(PoolError::Closed),
                Err(_) => {
                    return Err(PoolError::Exhausted {
                        capacity: self.shared.capacity,
                        timeout,
                    })
                }
            };

        let connection = self.shared.idle.lock().pop().ok_or(PoolError::Closed)?;
        self.shared.in_use.fetch_add(1, Ordering::AcqRel);

        Ok(PoolHandle {
            connection: Some(connection),
            shared: self.shared.clone(),
            _permit: permit,
        })
    }

    /// Return a handle to the pool. Equivalent to dropping it.
    pub fn release(&self, handle: PoolHandle<C>) {
        handle.release();
    }
}

/// Exclusive use of one pooled connection until released or dropped
pub struct PoolHandle<C> {
    connection: Option<C>,
    shared: Arc<Shared<C>>,
    _permit: OwnedSemaphorePermit,
}

impl<C> PoolHandle<C> {
    pub fn release(self) {
        drop(self);
    }
}

impl<C> Deref for PoolHandle<C> {
    type Target = C;

    fn deref(&self) -> &C {
        // Only taken in Drop
        self.connection
            .as_ref()
            .expect("pooled connection present until release")
    }
}

impl<C> DerefMut for PoolHandle<C> {
    fn deref_mut(&mut self) -> &mut C {
        self.connection
            .as_mut()
            .expect("pooled connection present until release")
    }
}

impl<C> Drop for PoolHandle<C> {
    fn drop(&mut self) {
        if let Some(connection) = self.connection.take() {
            self.shared.idle.lock().push(connection);
        }
        self.shared.in_use.fetch_sub(1, Ordering::AcqRel);
        // `_permit` is dropped after this body, waking the next waiter
    }
}
