//! Telemetry facade implemented by session adapters.
//!
//! A caller obtains a [`Telemetry`] session from a [`CreateFunc`], accumulates
//! attributes on its three [`Writer`]s and closes the session when done. None
//! of the operations fail from the caller's point of view.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single attribute to record on a writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Attribute name.
    pub key: String,
    /// Attribute value.
    pub value: Value,
}

impl KeyValue {
    /// Create a new attribute pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Shorthand for [`KeyValue::new`].
#[must_use]
pub fn kv(key: impl Into<String>, value: impl Into<Value>) -> KeyValue {
    KeyValue::new(key, value)
}

/// Session-scoped context such as tenant or request identifiers.
///
/// Every entry becomes a stream label on each line the session sends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(BTreeMap<String, String>);

impl Metadata {
    /// Create empty metadata.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Insert an entry, returning the previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Get the value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Accumulates attributes for one telemetry channel.
pub trait Writer: Send + Sync {
    /// Record attributes, overwriting earlier values with the same key.
    ///
    /// Returns the writer so calls can be chained.
    fn add(&self, kvs: Vec<KeyValue>) -> &dyn Writer;

    /// Ship everything recorded so far as one record and empty the writer.
    ///
    /// Does nothing when the writer is empty.
    fn flush(&self);

    /// Discard everything recorded so far.
    fn clear(&self);
}

/// One telemetry session with a writer per channel.
pub trait Telemetry: Send {
    /// Writer for log records.
    fn logger(&self) -> &dyn Writer;

    /// Writer for trace records.
    fn tracer(&self) -> &dyn Writer;

    /// Writer for metric records.
    fn meter(&self) -> &dyn Writer;

    /// Flush every writer and end the session.
    fn close(self: Box<Self>);
}

/// Starts a new telemetry session for the given metadata.
pub type CreateFunc = Arc<dyn Fn(Metadata) -> Box<dyn Telemetry> + Send + Sync>;
