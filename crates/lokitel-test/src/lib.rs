//! Lokitel Test - Shared test utilities for the lokitel adapter.
//!
//! This crate provides a recording transport and fixtures that can be used
//! across lokitel crates as a dev-dependency.
//!
//! # Usage
//!
//! ```rust
//! use lokitel_core::{Channel, KIND_LABEL, Transport, labels_from};
//! use lokitel_test::{RecordingTransport, test_metadata};
//! use serde_json::json;
//!
//! let transport = RecordingTransport::new();
//! let mut labels = labels_from(&test_metadata());
//! labels.insert(KIND_LABEL.to_string(), Channel::Log.as_str().to_string());
//! transport.log(labels, json!({"msg": "hello"}));
//!
//! let lines = transport.lines();
//! assert_eq!(lines.len(), 1);
//! assert!(lines[0].is_channel(Channel::Log));
//! assert_eq!(lines[0].label("tenant"), Some("test-tenant"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
