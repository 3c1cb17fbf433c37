//! Free list of reusable telemetry sessions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lokitel_core::{CreateFunc, Metadata, Telemetry, Transport};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::factory::ChannelBindings;
use crate::session::LokiSession;

/// Point-in-time pool counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Entries ever built.
    pub created: u64,
    /// Entries waiting in the free list.
    pub idle: usize,
    /// Total checkouts served.
    pub checkouts: u64,
    /// Total sessions returned by close.
    pub returns: u64,
}

impl PoolStats {
    /// Sessions checked out and not yet closed.
    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.checkouts.saturating_sub(self.returns)
    }
}

/// Pool internals, referenced weakly by every session it builds.
pub(crate) struct PoolShared {
    free: Mutex<Vec<Box<LokiSession>>>,
    transport: Arc<dyn Transport>,
    bindings: ChannelBindings,
    created: AtomicU64,
    checkouts: AtomicU64,
    returns: AtomicU64,
}

impl PoolShared {
    fn free(&self) -> MutexGuard<'_, Vec<Box<LokiSession>>> {
        self.free.lock().unwrap_or_else(|e| {
            warn!("SessionPool lock poisoned, recovering");
            PoisonError::into_inner(e)
        })
    }

    /// Put a closed session back on the free list.
    pub(crate) fn release(&self, session: Box<LokiSession>) {
        trace!(entry_id = session.entry_id(), "Session returned to pool");
        self.returns.fetch_add(1, Ordering::Relaxed);
        self.free().push(session);
    }
}

/// A growable pool of [`LokiSession`]s sharing one transport.
///
/// Entries are built on demand, never evicted and recycled on every close.
/// Cloning the pool is cheap and yields a handle to the same free list.
#[derive(Clone)]
pub struct SessionPool {
    shared: Arc<PoolShared>,
}

impl SessionPool {
    /// Create an empty pool.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, bindings: ChannelBindings) -> Self {
        Self {
            shared: Arc::new(PoolShared {
                free: Mutex::new(Vec::new()),
                transport,
                bindings,
                created: AtomicU64::new(0),
                checkouts: AtomicU64::new(0),
                returns: AtomicU64::new(0),
            }),
        }
    }

    /// Take an idle session, or build one, and bind `metadata` to it.
    #[must_use]
    pub fn checkout(&self, metadata: Metadata) -> Box<LokiSession> {
        // Bind the pop to its own statement so the free-list lock is released
        // before a new entry is built.
        let idle = self.shared.free().pop();
        let session = idle.unwrap_or_else(|| self.build());
        session.begin(metadata);
        self.shared.checkouts.fetch_add(1, Ordering::Relaxed);

        debug!(entry_id = session.entry_id(), "Session checked out");
        session
    }

    /// Build `count` entries ahead of demand.
    pub fn prewarm(&self, count: usize) {
        let built: Vec<_> = (0..count).map(|_| self.build()).collect();
        self.shared.free().extend(built);
    }

    /// A [`CreateFunc`] checking sessions out of this pool.
    #[must_use]
    pub fn create_func(&self) -> CreateFunc {
        let pool = self.clone();
        Arc::new(move |metadata: Metadata| -> Box<dyn Telemetry> { pool.checkout(metadata) })
    }

    /// Number of entries waiting in the free list.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.shared.free().len()
    }

    /// Number of entries ever built.
    #[must_use]
    pub fn created(&self) -> u64 {
        self.shared.created.load(Ordering::Relaxed)
    }

    /// Current counters.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            created: self.created(),
            idle: self.idle(),
            checkouts: self.shared.checkouts.load(Ordering::Relaxed),
            returns: self.shared.returns.load(Ordering::Relaxed),
        }
    }

    fn build(&self) -> Box<LokiSession> {
        let entry_id = self.shared.created.fetch_add(1, Ordering::Relaxed);
        debug!(entry_id, "Growing session pool");
        Box::new(LokiSession::new(
            entry_id,
            Arc::clone(&self.shared.transport),
            &self.shared.bindings,
            Arc::downgrade(&self.shared),
        ))
    }
}

impl std::fmt::Debug for SessionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionPool")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokitel_core::{Channel, kv};
    use lokitel_test::{RecordingTransport, test_metadata};

    fn test_pool(transport: &RecordingTransport) -> SessionPool {
        SessionPool::new(Arc::new(transport.clone()), ChannelBindings::default())
    }

    #[test]
    fn test_grows_lazily() {
        let transport = RecordingTransport::new();
        let pool = test_pool(&transport);
        assert_eq!(pool.created(), 0);
        assert_eq!(pool.idle(), 0);

        let a = pool.checkout(test_metadata());
        let b = pool.checkout(test_metadata());
        assert_eq!(pool.created(), 2);
        assert_ne!(a.entry_id(), b.entry_id());

        a.close();
        b.close();
        assert_eq!(pool.idle(), 2);
        assert_eq!(pool.created(), 2);
    }

    #[test]
    fn test_reuses_same_entry() {
        let transport = RecordingTransport::new();
        let pool = test_pool(&transport);

        let first = pool.checkout(Metadata::new().with("tenant", "a"));
        let first_id = first.entry_id();
        let first_addr: *const LokiSession = &*first;
        first.logger().add(vec![kv("msg", "one")]);
        first.close();

        let second = pool.checkout(Metadata::new().with("tenant", "b"));
        assert_eq!(second.entry_id(), first_id);
        assert!(std::ptr::eq(first_addr, &*second));
        assert_eq!(second.metadata().get("tenant"), Some("b"));
        for channel in Channel::ALL {
            assert_eq!(second.writer(channel).pending(), 0);
        }
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn test_prewarm() {
        let transport = RecordingTransport::new();
        let pool = test_pool(&transport);
        pool.prewarm(3);
        assert_eq!(pool.idle(), 3);
        assert_eq!(pool.created(), 3);

        let session = pool.checkout(test_metadata());
        assert_eq!(pool.idle(), 2);
        assert_eq!(pool.created(), 3);
        session.close();
    }

    #[test]
    fn test_stats() {
        let transport = RecordingTransport::new();
        let pool = test_pool(&transport);

        let a = pool.checkout(test_metadata());
        let b = pool.checkout(test_metadata());
        a.close();

        let stats = pool.stats();
        assert_eq!(stats.created, 2);
        assert_eq!(stats.checkouts, 2);
        assert_eq!(stats.returns, 1);
        assert_eq!(stats.idle, 1);
        assert_eq!(stats.outstanding(), 1);

        b.close();
        assert_eq!(pool.stats().outstanding(), 0);
    }

    #[test]
    fn test_dropped_session_is_not_returned() {
        let transport = RecordingTransport::new();
        let pool = test_pool(&transport);

        let session = pool.checkout(test_metadata());
        drop(session);

        assert_eq!(pool.idle(), 0);
        let replacement = pool.checkout(test_metadata());
        assert_eq!(pool.created(), 2);
        replacement.close();
    }

    #[test]
    fn test_create_func_shares_pool() {
        let transport = RecordingTransport::new();
        let pool = test_pool(&transport);
        let create = pool.create_func();

        let session = create(test_metadata());
        session.meter().add(vec![kv("count", 1)]);
        session.close();

        assert_eq!(pool.idle(), 1);
        assert_eq!(transport.kinds(), vec!["METRICS"]);
    }
}
