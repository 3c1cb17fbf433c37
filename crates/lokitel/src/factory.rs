//! Construction of pools and session constructors.

use std::fmt;
use std::sync::Arc;

use lokitel_core::{Binder, Channel, CreateFunc, PassthroughBinder, Transport};

use crate::config::AdapterConfig;
use crate::pool::SessionPool;

/// The binder used by each channel's writer.
#[derive(Clone)]
pub struct ChannelBindings {
    /// Binder for the log writer.
    pub log: Arc<dyn Binder>,
    /// Binder for the trace writer.
    pub trace: Arc<dyn Binder>,
    /// Binder for the metric writer.
    pub metric: Arc<dyn Binder>,
}

impl ChannelBindings {
    /// Use distinct binders per channel.
    #[must_use]
    pub fn new(log: Arc<dyn Binder>, trace: Arc<dyn Binder>, metric: Arc<dyn Binder>) -> Self {
        Self { log, trace, metric }
    }

    /// Use one binder for every channel.
    #[must_use]
    pub fn shared(binder: Arc<dyn Binder>) -> Self {
        Self {
            log: Arc::clone(&binder),
            trace: Arc::clone(&binder),
            metric: binder,
        }
    }

    /// Binder for `channel`.
    #[must_use]
    pub fn for_channel(&self, channel: Channel) -> &Arc<dyn Binder> {
        match channel {
            Channel::Log => &self.log,
            Channel::Trace => &self.trace,
            Channel::Metric => &self.metric,
        }
    }
}

impl Default for ChannelBindings {
    fn default() -> Self {
        Self::shared(Arc::new(PassthroughBinder))
    }
}

impl fmt::Debug for ChannelBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelBindings").finish_non_exhaustive()
    }
}

/// Builder for a [`SessionPool`] and the [`CreateFunc`] that draws from it.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use lokitel::{AdapterConfig, ChannelBindings, LokiFactory, TracingTransport};
/// use lokitel_core::{Metadata, Telemetry, kv};
///
/// let create = LokiFactory::new(Arc::new(TracingTransport), ChannelBindings::default())
///     .with_config(&AdapterConfig::default())
///     .into_create_func();
///
/// let session = create(Metadata::new().with("tenant", "acme"));
/// session.logger().add(vec![kv("msg", "hello")]);
/// session.close();
/// ```
pub struct LokiFactory {
    transport: Arc<dyn Transport>,
    bindings: ChannelBindings,
    prewarm: usize,
}

impl LokiFactory {
    /// Create a factory for `transport` with per-channel `bindings`.
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, bindings: ChannelBindings) -> Self {
        Self {
            transport,
            bindings,
            prewarm: 0,
        }
    }

    /// Apply the pool settings from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &AdapterConfig) -> Self {
        self.prewarm = config.prewarm;
        self
    }

    /// Build `count` pool entries up front.
    #[must_use]
    pub fn with_prewarm(mut self, count: usize) -> Self {
        self.prewarm = count;
        self
    }

    /// Build the pool.
    #[must_use]
    pub fn pool(self) -> SessionPool {
        let pool = SessionPool::new(self.transport, self.bindings);
        if self.prewarm > 0 {
            pool.prewarm(self.prewarm);
        }
        pool
    }

    /// Build the pool and return a constructor checking sessions out of it.
    #[must_use]
    pub fn into_create_func(self) -> CreateFunc {
        self.pool().create_func()
    }
}

impl fmt::Debug for LokiFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LokiFactory")
            .field("prewarm", &self.prewarm)
            .finish_non_exhaustive()
    }
}

/// Create a session constructor backed by a fresh pool.
///
/// Every session drawn from the returned function shares `transport`; each
/// channel renders its attributes with its own binder.
#[must_use]
pub fn create_func(
    transport: Arc<dyn Transport>,
    log: Arc<dyn Binder>,
    trace: Arc<dyn Binder>,
    metric: Arc<dyn Binder>,
) -> CreateFunc {
    LokiFactory::new(transport, ChannelBindings::new(log, trace, metric)).into_create_func()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokitel_core::{FlattenBinder, FnBinder, KIND_LABEL, Metadata, Telemetry, kv};
    use lokitel_test::{RecordingTransport, test_metadata};
    use serde_json::json;

    #[test]
    fn test_shared_bindings_point_to_one_binder() {
        let bindings = ChannelBindings::shared(Arc::new(FlattenBinder::new()));
        assert!(Arc::ptr_eq(&bindings.log, &bindings.trace));
        assert!(Arc::ptr_eq(&bindings.trace, &bindings.metric));
    }

    #[test]
    fn test_create_func_uses_per_channel_binders() {
        let transport = RecordingTransport::new();
        let tag = |name: &'static str| -> Arc<dyn Binder> {
            Arc::new(FnBinder::new(move |value| json!({"binder": name, "value": value})))
        };
        let create = create_func(
            Arc::new(transport.clone()),
            tag("log"),
            tag("trace"),
            tag("metric"),
        );

        let session = create(test_metadata());
        session.logger().add(vec![kv("a", 1)]);
        session.tracer().add(vec![kv("b", 2)]);
        session.meter().add(vec![kv("c", 3)]);
        session.close();

        let binders: Vec<_> = transport
            .lines()
            .into_iter()
            .map(|l| l.line["binder"].clone())
            .collect();
        assert_eq!(binders, vec![json!("log"), json!("trace"), json!("metric")]);
    }

    #[test]
    fn test_with_config_applies_pool_settings() {
        let transport = RecordingTransport::new();
        let config = AdapterConfig::from_toml_str("prewarm = 2").unwrap();

        let pool = LokiFactory::new(Arc::new(transport.clone()), ChannelBindings::default())
            .with_config(&config)
            .pool();
        assert_eq!(pool.idle(), 2);

        let metadata = Metadata::new().with("tenant", "acme").with(KIND_LABEL, "x");
        let session = pool.checkout(metadata);
        session.logger().add(vec![kv("msg", "hi")]);
        session.close();

        let lines = transport.lines();
        assert_eq!(lines[0].kind(), Some("LOG"));
        assert_eq!(lines[0].label("tenant"), Some("acme"));
    }
}
