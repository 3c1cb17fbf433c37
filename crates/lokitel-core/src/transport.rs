//! Transport collaborator that ships structured lines to a log backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::facade::Metadata;

/// Reserved label key carrying the channel of every shipped line.
///
/// Always set by the session, overriding a metadata entry of the same name.
pub const KIND_LABEL: &str = "kind";

/// Stream labels attached to a shipped line.
pub type Labels = BTreeMap<String, String>;

/// Copy session metadata into a fresh label set.
#[must_use]
pub fn labels_from(metadata: &Metadata) -> Labels {
    metadata
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// A batched log-shipping handle.
///
/// `log` is fire-and-forget: it enqueues the line and returns. Delivery
/// failures, retries and timeouts belong to the implementation. The handle
/// is shared by every session drawn from one pool, so it must be safe to call
/// concurrently.
pub trait Transport: Send + Sync {
    /// Submit one structured line tagged with `labels`.
    fn log(&self, labels: Labels, line: Value);
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn log(&self, labels: Labels, line: Value) {
        (**self).log(labels, line);
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn log(&self, labels: Labels, line: Value) {
        (**self).log(labels, line);
    }
}
