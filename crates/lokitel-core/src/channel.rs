//! Telemetry channels multiplexed onto one transport.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the three telemetry kinds a session writes.
///
/// The string form is the exact value placed in the `kind` stream label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Channel {
    /// Log records.
    #[serde(rename = "LOG")]
    Log,
    /// Trace records.
    #[serde(rename = "TRACE")]
    Trace,
    /// Metric records.
    #[serde(rename = "METRICS")]
    Metric,
}

impl Channel {
    /// All channels, in the order a session flushes them on close.
    pub const ALL: [Channel; 3] = [Channel::Log, Channel::Trace, Channel::Metric];

    /// Label value for this channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Log => "LOG",
            Self::Trace => "TRACE",
            Self::Metric => "METRICS",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a known channel label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown telemetry channel: {0}")]
pub struct ParseChannelError(
    /// The rejected input.
    pub String,
);

/// Parses the exact label value, so `"LOG"` is accepted and `"log"` is not.
impl FromStr for Channel {
    type Err = ParseChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == s)
            .ok_or_else(|| ParseChannelError(s.to_string()))
    }
}
