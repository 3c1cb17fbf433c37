//! Lokitel - Pooled telemetry writers over a batched log transport.
//!
//! This crate provides:
//! - Per-channel writers (log, trace, metric) that buffer attributes and ship
//!   them as one structured line per channel per session
//! - A growable pool of reusable sessions sharing a single [`Transport`]
//! - A factory returning the [`CreateFunc`] expected by the telemetry facade
//! - Configuration and logging setup for the embedding process
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lokitel::{ChannelBindings, LokiFactory, TracingTransport};
//! use lokitel_core::{Metadata, Telemetry, kv};
//!
//! let pool = LokiFactory::new(Arc::new(TracingTransport), ChannelBindings::default()).pool();
//!
//! let session = pool.checkout(Metadata::new().with("tenant", "acme"));
//! session
//!     .logger()
//!     .add(vec![kv("msg", "request served")])
//!     .add(vec![kv("status", 200)]);
//! session.meter().add(vec![kv("latency_ms", 12)]);
//!
//! // Ships one LOG line and one METRICS line, then returns the entry.
//! session.close();
//! assert_eq!(pool.idle(), 1);
//! ```
//!
//! [`Transport`]: lokitel_core::Transport
//! [`CreateFunc`]: lokitel_core::CreateFunc

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod buffer;
mod config;
mod error;
mod factory;
mod logging;
mod pool;
mod session;
mod transport;
mod writer;

pub use buffer::AttributeBuffer;
pub use config::AdapterConfig;
pub use error::{LokitelError, LokitelResult};
pub use factory::{ChannelBindings, LokiFactory, create_func};
pub use logging::{LogConfig, LogFormat, LogTarget, setup_default_logging, setup_logging};
pub use pool::{PoolStats, SessionPool};
pub use session::LokiSession;
pub use transport::{LINE_TARGET, TracingTransport};
pub use writer::ChannelWriter;
