//! Binders render accumulated attributes into the line payload.

use std::fmt;

use serde_json::{Map, Value};

/// Renders the attributes accumulated by a writer into the payload shipped
/// by the transport.
///
/// Binding is a pure function: it has no side effects and cannot fail.
pub trait Binder: Send + Sync {
    /// Render `value` into the line payload.
    fn bind(&self, value: Value) -> Value;
}

/// Ships the accumulated attributes unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassthroughBinder;

impl Binder for PassthroughBinder {
    fn bind(&self, value: Value) -> Value {
        value
    }
}

/// Flattens nested objects into a single level with joined keys.
///
/// `{"http": {"status": 200}}` becomes `{"http.status": 200}`. Arrays and
/// scalars are leaves. A non-object input is returned unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlattenBinder {
    separator: String,
}

impl FlattenBinder {
    /// Create a binder joining keys with `.`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_separator(".")
    }

    /// Create a binder joining keys with `separator`.
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    fn flatten_into(
        &self,
        prefix: Option<&str>,
        object: Map<String, Value>,
        out: &mut Map<String, Value>,
    ) {
        for (key, value) in object {
            let key = match prefix {
                Some(prefix) => format!("{prefix}{}{key}", self.separator),
                None => key,
            };
            match value {
                Value::Object(nested) if !nested.is_empty() => {
                    self.flatten_into(Some(&key), nested, out);
                },
                leaf => {
                    out.insert(key, leaf);
                },
            }
        }
    }
}

impl Default for FlattenBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Binder for FlattenBinder {
    fn bind(&self, value: Value) -> Value {
        match value {
            Value::Object(object) => {
                let mut out = Map::new();
                self.flatten_into(None, object, &mut out);
                Value::Object(out)
            },
            other => other,
        }
    }
}

/// Adapts a closure into a [`Binder`].
pub struct FnBinder<F>(F);

impl<F> FnBinder<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> fmt::Debug for FnBinder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBinder").finish_non_exhaustive()
    }
}

impl<F> Binder for FnBinder<F>
where
    F: Fn(Value) -> Value + Send + Sync,
{
    fn bind(&self, value: Value) -> Value {
        (self.0)(value)
    }
}
