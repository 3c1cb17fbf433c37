//! Prelude module - commonly used types for convenient import.
//!
//! Use `use lokitel_core::prelude::*;` to import all essential types.
//!
//! # Example
//!
//! ```rust
//! use lokitel_core::prelude::*;
//!
//! let metadata = Metadata::new().with("tenant", "acme");
//! let labels = labels_from(&metadata);
//! assert_eq!(labels.get("tenant").map(String::as_str), Some("acme"));
//! ```

// Facade
pub use crate::{CreateFunc, KeyValue, Metadata, Telemetry, Writer, kv};

// Channels
pub use crate::{Channel, ParseChannelError};

// Collaborators
pub use crate::{Binder, FlattenBinder, FnBinder, PassthroughBinder};
pub use crate::{KIND_LABEL, Labels, Transport, labels_from};
