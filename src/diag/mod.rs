//! Diagnostics sink for soft-failure reporting
//!
//! Resolution never aborts on malformed optional input; it substitutes a
//! default and reports the irregularity through a sink passed in by the
//! caller. Tests use [`CaptureSink`] to assert on the emitted diagnostics.

use std::sync::Mutex;

/// Severity of a captured diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warn,
    Error,
}

/// Sink for diagnostics emitted during parsing and resolution
pub trait Diagnostics {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Production sink forwarding to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Diagnostics for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "treesync::resolve", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "treesync::resolve", "{}", message);
    }
}

/// Recording sink for deterministic tests of soft-failure paths
#[derive(Debug, Default)]
pub struct CaptureSink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries in emission order
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().expect("diagnostics lock poisoned").clone()
    }

    /// Captured messages of the given severity
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().expect("diagnostics lock poisoned").is_empty()
    }
}

impl Diagnostics for CaptureSink {
    fn warn(&self, message: &str) {
        self.entries
            .lock()
            .expect("diagnostics lock poisoned")
            .push((Severity::Warn, message.to_string()));
    }

    fn error(&self, message: &str) {
        self.entries
            .lock()
            .expect("diagnostics lock poisoned")
            .push((Severity::Error, message.to_string()));
    }
}
