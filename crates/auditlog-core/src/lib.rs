//! auditlog-core — canonical JSON log records for audit and security events.
//!
//! This crate turns in-memory events into deterministic JSON log lines and
//! hands them to a caller-supplied logging sink at a chosen severity.
//!
//! # Architecture
//!
//! ```text
//! raw line ──► parse ──► Event ──► serialize ──► emit ──► LoggingSink
//!                          ▲
//!   AuditEntry ──► SecurityMirror
//! ```
//!
//! Everything here is stateless apart from the sinks themselves; the
//! normalizer functions are safe to call from any number of threads.

pub mod audit;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod sink;
pub mod types;

pub use error::{EmitError, SerializationError, SinkError};
pub use normalizer::{
    emit, emit_named, emit_with, parse, serialize, serialize_with, DebugRepr, Fallback,
};
pub use sink::{LoggingSink, MemorySink, TracingSink};
pub use types::{Event, Extra, FieldValue, Fields, Opaque, Severity};
