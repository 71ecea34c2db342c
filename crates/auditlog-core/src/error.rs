//! Error types for auditlog-core.

use thiserror::Error;

/// Failure to turn an [`Event`](crate::Event) into JSON text.
#[derive(Debug, Error)]
pub enum SerializationError {
    /// The fallback renderer rejected an opaque value.
    #[error("fallback could not render value of type {type_name}")]
    Fallback {
        type_name: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to encode event as JSON: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("encoder produced invalid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Failure raised by a [`LoggingSink`](crate::LoggingSink).
#[derive(Debug, Error)]
pub enum SinkError {
    /// An extra field would shadow an attribute the sink sets itself.
    #[error("extra field {0:?} would overwrite a reserved log record attribute")]
    ReservedKey(String),

    #[error("sink state is poisoned by a panicked writer")]
    Poisoned,

    #[error("failed to encode extra fields: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failure of [`emit`](crate::emit): either the event could not be
/// serialized or the sink refused it.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("logging sink rejected the record: {0}")]
    Sink(#[source] SinkError),
}
