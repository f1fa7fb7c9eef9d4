//! Logging collaborator used to report handler failures.
//!
//! The dispatcher only ever logs one kind of message: a handler panicked.
//! Where that message goes is up to the [`FailureLogger`] implementation.

use std::fmt;
use tracing::error;

/// Sink for handler failure reports.
///
/// Any `Fn(fmt::Arguments<'_>)` closure is a logger, which makes capturing
/// reports in tests a one-liner.
pub trait FailureLogger: Send + Sync {
    /// Log a formatted message
    fn log(&self, args: fmt::Arguments<'_>);
}

impl<F> FailureLogger for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn log(&self, args: fmt::Arguments<'_>) {
        self(args)
    }
}

/// Forwards failure reports to `tracing` at error level.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger {
    prefix: Option<String>,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepends `prefix` to every message, e.g. `"bus: "`.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl FailureLogger for TracingLogger {
    fn log(&self, args: fmt::Arguments<'_>) {
        match &self.prefix {
            Some(prefix) => error!(target: "tagbus", "❌ {}{}", prefix, args),
            None => error!(target: "tagbus", "❌ {}", args),
        }
    }
}
