//! Logging sinks — where normalized log lines end up.
//!
//! A [`LoggingSink`] exposes one method per [`Severity`]. The normalizer
//! never constructs or owns a sink; it borrows one per call.

use std::sync::Mutex;

use crate::error::SinkError;
use crate::types::{Extra, Severity};

/// Destination for normalized log lines.
///
/// Implementations must be safe to share between threads; the normalizer
/// may call the same sink concurrently.
pub trait LoggingSink: Send + Sync {
    fn debug(&self, message: &str, extra: &Extra) -> Result<(), SinkError>;
    fn info(&self, message: &str, extra: &Extra) -> Result<(), SinkError>;
    fn warning(&self, message: &str, extra: &Extra) -> Result<(), SinkError>;
    fn error(&self, message: &str, extra: &Extra) -> Result<(), SinkError>;

    /// Dispatch to the method matching `severity`.
    fn log(&self, severity: Severity, message: &str, extra: &Extra) -> Result<(), SinkError> {
        match severity {
            Severity::Debug => self.debug(message, extra),
            Severity::Info => self.info(message, extra),
            Severity::Warning => self.warning(message, extra),
            Severity::Error => self.error(message, extra),
        }
    }
}

impl<S: LoggingSink + ?Sized> LoggingSink for &S {
    fn debug(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).debug(message, extra)
    }
    fn info(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).info(message, extra)
    }
    fn warning(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).warning(message, extra)
    }
    fn error(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).error(message, extra)
    }
}

impl<S: LoggingSink + ?Sized> LoggingSink for std::sync::Arc<S> {
    fn debug(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).debug(message, extra)
    }
    fn info(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).info(message, extra)
    }
    fn warning(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).warning(message, extra)
    }
    fn error(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        (**self).error(message, extra)
    }
}

// ---------------------------------------------------------------------------
// TracingSink
// ---------------------------------------------------------------------------

/// Record attributes a [`TracingSink`] owns. Extra fields may not use them.
pub const RESERVED_KEYS: &[&str] = &[
    "args",
    "asctime",
    "created",
    "exc_info",
    "filename",
    "funcName",
    "levelname",
    "levelno",
    "lineno",
    "logger",
    "message",
    "module",
    "msecs",
    "msg",
    "name",
    "pathname",
    "process",
    "thread",
    "threadName",
];

/// Sink that forwards every line to the `tracing` dispatcher.
///
/// The line becomes the event message; `logger` and the JSON-encoded
/// `extra` mapping are attached as structured fields.
#[derive(Debug, Clone)]
pub struct TracingSink {
    logger: String,
}

impl TracingSink {
    pub fn new(logger: impl Into<String>) -> Self {
        Self {
            logger: logger.into(),
        }
    }

    pub fn logger(&self) -> &str {
        &self.logger
    }

    fn encode_extra(&self, extra: &Extra) -> Result<String, SinkError> {
        if let Some(key) = extra.keys().find(|k| RESERVED_KEYS.contains(&k.as_str())) {
            return Err(SinkError::ReservedKey(key.clone()));
        }
        Ok(serde_json::to_string(extra)?)
    }
}

impl LoggingSink for TracingSink {
    fn debug(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        let extra = self.encode_extra(extra)?;
        tracing::debug!(logger = %self.logger, extra = %extra, "{message}");
        Ok(())
    }

    fn info(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        let extra = self.encode_extra(extra)?;
        tracing::info!(logger = %self.logger, extra = %extra, "{message}");
        Ok(())
    }

    fn warning(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        let extra = self.encode_extra(extra)?;
        tracing::warn!(logger = %self.logger, extra = %extra, "{message}");
        Ok(())
    }

    fn error(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        let extra = self.encode_extra(extra)?;
        tracing::error!(logger = %self.logger, extra = %extra, "{message}");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemorySink
// ---------------------------------------------------------------------------

/// One call captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub severity: Severity,
    pub message: String,
    pub extra: Extra,
}

/// Sink that keeps every call in memory, in call order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Record>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Result<Vec<Record>, SinkError> {
        Ok(self.records.lock().map_err(|_| SinkError::Poisoned)?.clone())
    }

    /// Remove and return everything recorded so far.
    pub fn drain(&self) -> Result<Vec<Record>, SinkError> {
        let mut records = self.records.lock().map_err(|_| SinkError::Poisoned)?;
        Ok(std::mem::take(&mut *records))
    }

    fn push(&self, severity: Severity, message: &str, extra: &Extra) -> Result<(), SinkError> {
        self.records
            .lock()
            .map_err(|_| SinkError::Poisoned)?
            .push(Record {
                severity,
                message: message.to_string(),
                extra: extra.clone(),
            });
        Ok(())
    }
}

impl LoggingSink for MemorySink {
    fn debug(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        self.push(Severity::Debug, message, extra)
    }

    fn info(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        self.push(Severity::Info, message, extra)
    }

    fn warning(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        self.push(Severity::Warning, message, extra)
    }

    fn error(&self, message: &str, extra: &Extra) -> Result<(), SinkError> {
        self.push(Severity::Error, message, extra)
    }
}
