//! Lock-guarded attribute storage for a single writer.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lokitel_core::KeyValue;
use serde_json::{Map, Value};
use tracing::warn;

/// Attribute name to value mapping shared by concurrent writers.
///
/// Mutations take the exclusive lock. A poisoned lock is recovered rather
/// than propagated, since none of the buffer operations can fail.
#[derive(Debug, Default)]
pub struct AttributeBuffer {
    entries: RwLock<Map<String, Value>>,
}

impl AttributeBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Map<String, Value>> {
        self.entries.read().unwrap_or_else(|e| {
            warn!("AttributeBuffer read lock poisoned, recovering");
            PoisonError::into_inner(e)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Map<String, Value>> {
        self.entries.write().unwrap_or_else(|e| {
            warn!("AttributeBuffer lock poisoned, recovering");
            PoisonError::into_inner(e)
        })
    }

    /// Insert every pair, later pairs overwriting earlier ones with the same key.
    pub fn insert_all(&self, kvs: Vec<KeyValue>) {
        let mut entries = self.write();
        for KeyValue { key, value } in kvs {
            entries.insert(key, value);
        }
    }

    /// Take everything buffered, leaving the buffer empty.
    ///
    /// Returns `None` when there is nothing to take.
    pub fn drain(&self) -> Option<Map<String, Value>> {
        let mut entries = self.write();
        if entries.is_empty() {
            return None;
        }
        Some(std::mem::take(&mut *entries))
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Copy of the current entries.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.read().clone()
    }

    /// Number of buffered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
