//! Pooled telemetry sessions.
//!
//! A [`LokiSession`] is created once per pool entry and reused for many
//! logical sessions. Each checkout binds fresh metadata; closing flushes the
//! three writers, clears all session state and hands the entry back to the
//! pool it came from.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};

use lokitel_core::{
    Binder, Channel, KIND_LABEL, Metadata, Telemetry, Transport, Writer, labels_from,
};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::factory::ChannelBindings;
use crate::pool::PoolShared;
use crate::writer::ChannelWriter;

/// State shared between a session and its writers.
///
/// Writers hold a `Weak` to this so they can send through the session
/// without owning it.
pub(crate) struct SessionLink {
    transport: Arc<dyn Transport>,
    metadata: RwLock<Metadata>,
}

impl SessionLink {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            metadata: RwLock::new(Metadata::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Metadata> {
        self.metadata.read().unwrap_or_else(|e| {
            warn!("Session metadata read lock poisoned, recovering");
            PoisonError::into_inner(e)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Metadata> {
        self.metadata.write().unwrap_or_else(|e| {
            warn!("Session metadata lock poisoned, recovering");
            PoisonError::into_inner(e)
        })
    }

    pub(crate) fn set_metadata(&self, metadata: Metadata) {
        *self.write() = metadata;
    }

    pub(crate) fn clear_metadata(&self) {
        self.write().clear();
    }

    pub(crate) fn metadata(&self) -> Metadata {
        self.read().clone()
    }

    /// Render `value` and ship it tagged with the session labels plus the
    /// channel kind.
    pub(crate) fn send(&self, channel: Channel, binder: &dyn Binder, value: Value) {
        let line = binder.bind(value);
        let mut labels = labels_from(&self.read());
        labels.insert(KIND_LABEL.to_string(), channel.as_str().to_string());

        trace!(kind = %channel, labels = labels.len(), "Sending line");
        self.transport.log(labels, line);
    }
}

/// A pooled telemetry session with one writer per channel.
///
/// Obtained from [`SessionPool::checkout`](crate::SessionPool::checkout) and
/// ended with [`Telemetry::close`]. Ownership of the box is what makes a
/// session exclusive to its caller; closing consumes it.
pub struct LokiSession {
    entry_id: u64,
    link: Arc<SessionLink>,
    logger: ChannelWriter,
    tracer: ChannelWriter,
    meter: ChannelWriter,
    pool: Weak<PoolShared>,
}

impl LokiSession {
    pub(crate) fn new(
        entry_id: u64,
        transport: Arc<dyn Transport>,
        bindings: &ChannelBindings,
        pool: Weak<PoolShared>,
    ) -> Self {
        let link = Arc::new(SessionLink::new(transport));
        let writer = |channel| {
            ChannelWriter::new(
                channel,
                Arc::clone(bindings.for_channel(channel)),
                Arc::downgrade(&link),
            )
        };

        Self {
            entry_id,
            logger: writer(Channel::Log),
            tracer: writer(Channel::Trace),
            meter: writer(Channel::Metric),
            link,
            pool,
        }
    }

    /// Identifier of the pool entry backing this session.
    ///
    /// Stable across checkouts of the same entry.
    #[must_use]
    pub fn entry_id(&self) -> u64 {
        self.entry_id
    }

    /// Metadata bound at checkout.
    #[must_use]
    pub fn metadata(&self) -> Metadata {
        self.link.metadata()
    }

    /// Concrete writer for `channel`.
    #[must_use]
    pub fn writer(&self, channel: Channel) -> &ChannelWriter {
        match channel {
            Channel::Log => &self.logger,
            Channel::Trace => &self.tracer,
            Channel::Metric => &self.meter,
        }
    }

    /// Render `value` with `binder` and ship it as one line on `channel`.
    ///
    /// The line carries a copy of the session metadata as labels plus the
    /// channel kind. Transport failures are not reported.
    pub fn send(&self, channel: Channel, binder: &dyn Binder, value: Value) {
        self.link.send(channel, binder, value);
    }

    pub(crate) fn begin(&self, metadata: Metadata) {
        self.link.set_metadata(metadata);
    }

    /// Flush in close order, then leave every writer and the metadata empty.
    fn finish(&self) {
        for channel in Channel::ALL {
            self.writer(channel).flush();
        }
        for channel in Channel::ALL {
            self.writer(channel).clear();
        }
        self.link.clear_metadata();
    }
}

impl Telemetry for LokiSession {
    fn logger(&self) -> &dyn Writer {
        &self.logger
    }

    fn tracer(&self) -> &dyn Writer {
        &self.tracer
    }

    fn meter(&self) -> &dyn Writer {
        &self.meter
    }

    fn close(self: Box<Self>) {
        self.finish();
        match self.pool.upgrade() {
            Some(pool) => pool.release(self),
            None => debug!(entry_id = self.entry_id, "Pool dropped, discarding session"),
        }
    }
}

impl fmt::Debug for LokiSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LokiSession")
            .field("entry_id", &self.entry_id)
            .field("metadata", &self.metadata())
            .field("logger", &self.logger)
            .field("tracer", &self.tracer)
            .field("meter", &self.meter)
            .finish_non_exhaustive()
    }
}
