//! Per-channel writers that buffer attributes until flushed.

use std::fmt;
use std::sync::{Arc, Weak};

use lokitel_core::{Binder, Channel, KeyValue, Writer};
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::buffer::AttributeBuffer;
use crate::session::SessionLink;

/// Buffers attributes for one channel of a session.
///
/// A flush ships everything buffered as a single record through the owning
/// session. The writer only holds a weak handle to its session, so it never
/// keeps the session alive on its own.
pub struct ChannelWriter {
    channel: Channel,
    binder: Arc<dyn Binder>,
    buffer: AttributeBuffer,
    owner: Weak<SessionLink>,
}

impl ChannelWriter {
    pub(crate) fn new(channel: Channel, binder: Arc<dyn Binder>, owner: Weak<SessionLink>) -> Self {
        Self {
            channel,
            binder,
            buffer: AttributeBuffer::new(),
            owner,
        }
    }

    /// Channel this writer records.
    #[must_use]
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Number of distinct attribute keys waiting to be flushed.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Copy of the attributes waiting to be flushed.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.buffer.snapshot()
    }
}

impl Writer for ChannelWriter {
    fn add(&self, kvs: Vec<KeyValue>) -> &dyn Writer {
        trace!(channel = %self.channel, count = kvs.len(), "adding attributes");
        self.buffer.insert_all(kvs);
        self
    }

    fn flush(&self) {
        // Draining under one exclusive section keeps concurrent adds from
        // landing between the read and the clear.
        let Some(attributes) = self.buffer.drain() else {
            return;
        };

        if let Some(owner) = self.owner.upgrade() {
            owner.send(self.channel, self.binder.as_ref(), Value::Object(attributes));
        } else {
            debug!(
                channel = %self.channel,
                dropped = attributes.len(),
                "Session released, discarding attributes"
            );
        }
    }

    fn clear(&self) {
        self.buffer.clear();
    }
}

impl fmt::Debug for ChannelWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelWriter")
            .field("channel", &self.channel)
            .field("pending", &self.pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokitel_core::{FnBinder, Metadata, PassthroughBinder, kv};
    use lokitel_test::RecordingTransport;
    use serde_json::json;

    fn test_link(transport: &RecordingTransport) -> Arc<SessionLink> {
        let link = Arc::new(SessionLink::new(Arc::new(transport.clone())));
        link.set_metadata(Metadata::new().with("tenant", "acme"));
        link
    }

    fn test_writer(channel: Channel, link: &Arc<SessionLink>) -> ChannelWriter {
        ChannelWriter::new(channel, Arc::new(PassthroughBinder), Arc::downgrade(link))
    }

    #[test]
    fn test_flush_empty_sends_nothing() {
        let transport = RecordingTransport::new();
        let link = test_link(&transport);
        let writer = test_writer(Channel::Log, &link);

        writer.flush();
        writer.clear();
        writer.flush();

        assert!(transport.is_empty());
        assert_eq!(writer.pending(), 0);
    }

    #[test]
    fn test_flush_sends_one_nested_record() {
        let transport = RecordingTransport::new();
        let link = test_link(&transport);
        let writer = test_writer(Channel::Log, &link);

        writer
            .add(vec![kv("msg", "hello")])
            .add(vec![kv("status", 200), kv("ok", true)]);
        writer.flush();

        let lines = transport.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line, json!({"msg": "hello", "status": 200, "ok": true}));
        assert_eq!(lines[0].kind(), Some("LOG"));
        assert_eq!(lines[0].label("tenant"), Some("acme"));
    }

    #[test]
    fn test_flush_drains_exactly_once() {
        let transport = RecordingTransport::new();
        let link = test_link(&transport);
        let writer = test_writer(Channel::Trace, &link);

        writer.add(vec![kv("span", "db")]);
        writer.flush();
        writer.flush();

        assert_eq!(transport.len(), 1);
        assert_eq!(writer.pending(), 0);
    }

    #[test]
    fn test_last_write_wins_across_calls() {
        let transport = RecordingTransport::new();
        let link = test_link(&transport);
        let writer = test_writer(Channel::Metric, &link);

        writer.add(vec![kv("count", 1), kv("count", 2)]);
        writer.add(vec![kv("count", 3)]);
        writer.flush();

        assert_eq!(transport.lines()[0].line, json!({"count": 3}));
    }

    #[test]
    fn test_binder_applied_to_snapshot() {
        let transport = RecordingTransport::new();
        let link = test_link(&transport);
        let binder = FnBinder::new(|value| json!({"attributes": value}));
        let writer = ChannelWriter::new(Channel::Log, Arc::new(binder), Arc::downgrade(&link));

        writer.add(vec![kv("a", 1)]);
        writer.flush();

        assert_eq!(transport.lines()[0].line, json!({"attributes": {"a": 1}}));
    }

    #[test]
    fn test_flush_without_owner_discards() {
        let transport = RecordingTransport::new();
        let link = test_link(&transport);
        let writer = test_writer(Channel::Log, &link);
        drop(link);

        writer.add(vec![kv("a", 1)]);
        writer.flush();

        assert!(transport.is_empty());
        assert_eq!(writer.pending(), 0);
    }

    #[test]
    fn test_clear_discards() {
        let transport = RecordingTransport::new();
        let link = test_link(&transport);
        let writer = test_writer(Channel::Log, &link);

        writer.add(vec![kv("a", 1)]);
        writer.clear();
        writer.flush();

        assert!(transport.is_empty());
    }
}
