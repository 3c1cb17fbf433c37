//! Test fixtures for common types.

use std::sync::Arc;

use lokitel_core::{Binder, KeyValue, Metadata, PassthroughBinder, kv};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// Create test session metadata with a fixed tenant and a fresh request id.
#[must_use]
pub fn test_metadata() -> Metadata {
    test_metadata_for("test-tenant")
}

/// Create test session metadata for a specific tenant.
#[must_use]
pub fn test_metadata_for(tenant: impl Into<String>) -> Metadata {
    Metadata::new()
        .with("tenant", tenant)
        .with("request_id", Uuid::new_v4().to_string())
}

/// Create a passthrough binder behind an `Arc`, ready for a factory.
#[must_use]
pub fn test_binder() -> Arc<dyn Binder> {
    Arc::new(PassthroughBinder)
}

/// Create `count` attribute pairs with distinct keys `{prefix}-{i}`.
#[must_use]
pub fn test_pairs(prefix: &str, count: usize) -> Vec<KeyValue> {
    (0..count)
        .map(|i| kv(format!("{prefix}-{i}"), i))
        .collect()
}

/// Install a test-friendly tracing subscriber.
///
/// Honors `RUST_LOG` and is safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_is_unique_per_call() {
        let a = test_metadata();
        let b = test_metadata();
        assert_eq!(a.get("tenant"), Some("test-tenant"));
        assert_ne!(a.get("request_id"), b.get("request_id"));
    }

    #[test]
    fn test_pairs_are_distinct() {
        let pairs = test_pairs("k", 3);
        let keys: Vec<_> = pairs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["k-0", "k-1", "k-2"]);
    }
}
