//! Core types for auditlog-core.
//!
//! This module defines the data handed to the normalizer: the [`Event`]
//! payload, its [`FieldValue`] tree, the [`Severity`] selecting a sink
//! method, and the [`Extra`] context forwarded to sinks untouched.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Mapping of field names to values inside a structured event.
pub type Fields = BTreeMap<String, FieldValue>;

/// Extra context forwarded verbatim to a [`LoggingSink`](crate::LoggingSink).
///
/// The sink, not the normalizer, decides what the keys mean (request ids,
/// client addresses, …).
pub type Extra = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Opaque values
// ---------------------------------------------------------------------------

/// A value with no native JSON representation: domain records, timestamps,
/// handles. Rendered through a [`Fallback`](crate::Fallback) at serialization
/// time.
///
/// Implemented for every `Debug + Send + Sync + 'static` type.
pub trait Opaque: fmt::Debug + Send + Sync + 'static {
    /// Access the concrete value, e.g. for downcasting in a custom fallback.
    fn as_any(&self) -> &dyn Any;

    /// Rust type name of the concrete value.
    fn type_name(&self) -> &'static str;
}

impl<T> Opaque for T
where
    T: fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// One value inside an [`Event`]. Mirrors the JSON data model, plus
/// [`FieldValue::Opaque`] for values the encoder cannot represent directly.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<FieldValue>),
    Object(Fields),
    Opaque(Arc<dyn Opaque>),
}

impl FieldValue {
    /// Wrap an arbitrary value as opaque.
    pub fn opaque<T: Opaque>(value: T) -> Self {
        FieldValue::Opaque(Arc::new(value))
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            FieldValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Opaque values compare by identity; everything else structurally.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldValue::Null, FieldValue::Null) => true,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::Number(a), FieldValue::Number(b)) => a == b,
            (FieldValue::String(a), FieldValue::String(b)) => a == b,
            (FieldValue::Array(a), FieldValue::Array(b)) => a == b,
            (FieldValue::Object(a), FieldValue::Object(b)) => a == b,
            (FieldValue::Opaque(a), FieldValue::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => FieldValue::Number(n),
            serde_json::Value::String(s) => FieldValue::String(s),
            serde_json::Value::Array(items) => {
                FieldValue::Array(items.into_iter().map(FieldValue::from).collect())
            }
            serde_json::Value::Object(map) => FieldValue::Object(
                map.into_iter().map(|(k, v)| (k, FieldValue::from(v))).collect(),
            ),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        FieldValue::Number(value.into())
    }
}

impl From<u8> for FieldValue {
    fn from(value: u8) -> Self {
        FieldValue::Number(value.into())
    }
}

/// Non-finite floats have no JSON form and become `null`.
impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(FieldValue::Number)
            .unwrap_or(FieldValue::Null)
    }
}

impl From<Fields> for FieldValue {
    fn from(value: Fields) -> Self {
        FieldValue::Object(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::Array(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// The payload to be logged.
///
/// Either a structured value (usually a mapping) or a preformatted text
/// message. Events are only ever borrowed by the normalizer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Structured(FieldValue),
    Text(String),
}

impl Event {
    /// Build a mapping event from key/value pairs. Later duplicates win.
    pub fn record<K, I>(pairs: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldValue)>,
    {
        Event::Structured(FieldValue::Object(
            pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn text(message: impl Into<String>) -> Self {
        Event::Text(message.into())
    }

    /// The top-level mapping, if this is a structured mapping event.
    pub fn fields(&self) -> Option<&Fields> {
        match self {
            Event::Structured(value) => value.as_object(),
            Event::Text(_) => None,
        }
    }
}

impl From<Fields> for Event {
    fn from(value: Fields) -> Self {
        Event::Structured(FieldValue::Object(value))
    }
}

impl From<FieldValue> for Event {
    fn from(value: FieldValue) -> Self {
        Event::Structured(value)
    }
}

impl From<String> for Event {
    fn from(value: String) -> Self {
        Event::Text(value)
    }
}

impl From<&str> for Event {
    fn from(value: &str) -> Self {
        Event::Text(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Severity selecting which [`LoggingSink`](crate::LoggingSink) method is
/// called.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    #[default]
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
    ];

    /// Resolve a level name. Only the exact names `debug`, `info`, `warning`
    /// and `error` are recognised; anything else is `Debug`.
    pub fn from_name(name: &str) -> Self {
        Self::parse_name(name).unwrap_or_else(|| {
            tracing::debug!(level = name, "unrecognised severity, using debug");
            Severity::Debug
        })
    }

    /// Strict lookup, `None` for unrecognised names.
    pub fn parse_name(name: &str) -> Option<Self> {
        match name {
            "debug" => Some(Severity::Debug),
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Severity {
    fn from(value: &str) -> Self {
        Severity::from_name(value)
    }
}
