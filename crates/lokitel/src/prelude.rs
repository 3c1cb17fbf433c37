//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lokitel::prelude::*;` to import all essential types, including
//! the facade traits from `lokitel_core`.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use lokitel::prelude::*;
//!
//! let create = create_func(
//!     Arc::new(TracingTransport),
//!     Arc::new(PassthroughBinder),
//!     Arc::new(PassthroughBinder),
//!     Arc::new(PassthroughBinder),
//! );
//!
//! let session = create(Metadata::new().with("tenant", "acme"));
//! session.tracer().add(vec![kv("span", "checkout")]);
//! session.close();
//! ```

// Errors
pub use crate::{LokitelError, LokitelResult};

// Pool and sessions
pub use crate::{ChannelBindings, ChannelWriter, LokiFactory, LokiSession, PoolStats, SessionPool};
pub use crate::create_func;

// Configuration and logging
pub use crate::{AdapterConfig, LogConfig, LogFormat, LogTarget};
pub use crate::{setup_default_logging, setup_logging};

// Transports
pub use crate::TracingTransport;

// Facade
pub use lokitel_core::prelude::*;
