//! Per-call context threaded through every shim operation.
//!
//! Logging is explicit: a [`CallContext`] carries a [`Logger`] handle
//! instead of stashing one in ambient state.

use std::{fmt, sync::Arc};

use crate::error::Operation;

/// Leveled log sink.
pub trait Log: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// A [`Log`] with an extra channel for ephemeral status messages.
pub trait Logger: Log {
    /// Sink for status messages that are shown while an operation runs and
    /// are not kept in the permanent log.
    fn status(&self) -> &dyn Log;
}

/// Logger emitting `tracing` events tagged with the operation name and,
/// when known, the resource URN.
#[derive(Debug, Clone)]
pub struct TracingLogger {
    operation: &'static str,
    urn: Option<String>,
    status: TracingStatus,
}

impl TracingLogger {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            urn: None,
            status: TracingStatus {
                operation,
                urn: None,
            },
        }
    }

    pub fn with_urn(mut self, urn: impl Into<String>) -> Self {
        let urn = urn.into();
        self.status.urn = Some(urn.clone());
        self.urn = Some(urn);
        self
    }
}

impl Log for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(operation = self.operation, urn = ?self.urn, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(operation = self.operation, urn = ?self.urn, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(operation = self.operation, urn = ?self.urn, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(operation = self.operation, urn = ?self.urn, "{}", message);
    }
}

impl Logger for TracingLogger {
    fn status(&self) -> &dyn Log {
        &self.status
    }
}

#[derive(Debug, Clone)]
struct TracingStatus {
    operation: &'static str,
    urn: Option<String>,
}

impl Log for TracingStatus {
    fn debug(&self, message: &str) {
        tracing::debug!(operation = self.operation, urn = ?self.urn, status = true, "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(operation = self.operation, urn = ?self.urn, status = true, "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(operation = self.operation, urn = ?self.urn, status = true, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(operation = self.operation, urn = ?self.urn, status = true, "{}", message);
    }
}

/// Context of a single shim call.
#[derive(Clone)]
pub struct CallContext {
    operation: &'static str,
    logger: Arc<dyn Logger>,
}

impl CallContext {
    /// Context for `operation`, logging through `tracing`.
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            logger: Arc::new(TracingLogger::new(operation)),
        }
    }

    /// Context for a runtime operation.
    pub fn for_operation(operation: Operation) -> Self {
        Self::new(operation.as_str())
    }

    /// Context with no particular operation, e.g. for schema reads at startup.
    pub fn background() -> Self {
        Self::new("background")
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }
}

impl fmt::Debug for CallContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::background()
    }
}
