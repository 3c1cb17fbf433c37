//! Mock implementations for testing.

use std::sync::{Arc, Mutex};

use lokitel_core::{Channel, KIND_LABEL, Labels, Transport};
use serde_json::Value;

/// A line captured by [`RecordingTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLine {
    /// Stream labels the line was tagged with.
    pub labels: Labels,
    /// Line payload.
    pub line: Value,
}

impl RecordedLine {
    /// Value of the `kind` label.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.label(KIND_LABEL)
    }

    /// Value of an arbitrary label.
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    /// Whether this line was sent on `channel` (by its `kind` label).
    #[must_use]
    pub fn is_channel(&self, channel: Channel) -> bool {
        self.kind() == Some(channel.as_str())
    }
}

/// Mock implementation of the `Transport` trait that records every line.
///
/// Uses `std::sync::Mutex` so it can be shared across threads without a
/// runtime.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    lines: Arc<Mutex<Vec<RecordedLine>>>,
}

impl RecordingTransport {
    /// Create a new recording transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get every captured line, in submission order.
    #[must_use]
    pub fn lines(&self) -> Vec<RecordedLine> {
        self.lines.lock().map(|g| g.clone()).unwrap_or_default()
    }

    /// Get the `kind` label of every captured line, in submission order.
    #[must_use]
    pub fn kinds(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| l.kind().map(str::to_string))
            .collect()
    }

    /// Number of captured lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().map(|g| g.len()).unwrap_or_default()
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget all captured lines.
    pub fn reset(&self) {
        if let Ok(mut guard) = self.lines.lock() {
            guard.clear();
        }
    }
}

impl Transport for RecordingTransport {
    fn log(&self, labels: Labels, line: Value) {
        if let Ok(mut guard) = self.lines.lock() {
            guard.push(RecordedLine { labels, line });
        }
    }
}
