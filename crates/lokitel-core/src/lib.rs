//! Lokitel Core - Contracts shared by the lokitel telemetry adapter.
//!
//! This crate provides:
//! - The telemetry facade: [`Writer`], [`Telemetry`] and the [`CreateFunc`] shape
//! - Session [`Metadata`] and attribute [`KeyValue`] pairs
//! - The [`Transport`] collaborator that ships one structured line per call
//! - The [`Binder`] collaborator that renders accumulated attributes
//!
//! # Example
//!
//! ```rust
//! use lokitel_core::{Channel, Metadata, kv};
//!
//! let metadata = Metadata::new()
//!     .with("tenant", "acme")
//!     .with("request_id", "r-42");
//!
//! let pair = kv("latency_ms", 12);
//! assert_eq!(pair.key, "latency_ms");
//! assert_eq!(Channel::Metric.as_str(), "METRICS");
//! assert_eq!(metadata.get("tenant"), Some("acme"));
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod binding;
mod channel;
mod facade;
mod transport;

pub use binding::{Binder, FlattenBinder, FnBinder, PassthroughBinder};
pub use channel::{Channel, ParseChannelError};
pub use facade::{CreateFunc, KeyValue, Metadata, Telemetry, Writer, kv};
pub use transport::{KIND_LABEL, Labels, Transport, labels_from};
