//! Local transport that writes lines to the tracing subscriber.

use lokitel_core::{Labels, Transport};
use serde_json::Value;
use tracing::info;

/// Target used for every event emitted by [`TracingTransport`].
pub const LINE_TARGET: &str = "lokitel::line";

/// Emits every line as an `INFO` event under the [`LINE_TARGET`] target.
///
/// Useful in development and tests where no log backend is running. Enable
/// or silence it with a `lokitel::line=...` filter directive.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTransport;

impl Transport for TracingTransport {
    fn log(&self, labels: Labels, line: Value) {
        let labels = serde_json::to_string(&labels).unwrap_or_default();
        info!(target: LINE_TARGET, labels = %labels, line = %line, "telemetry line");
    }
}
