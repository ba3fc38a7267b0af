use std::borrow::Cow;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::Level;

/// A single categorized message emitted by a pipeline component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    /// Stable machine-readable code, e.g. `head_connection_error`.
    pub code: Cow<'static, str>,
    pub message: String,
}

/// Destination for diagnostics.
pub trait DiagnosticSink: Send + Sync + fmt::Debug {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Forwards diagnostics to the global `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        let code = diagnostic.code.as_ref();
        let message = diagnostic.message.as_str();

        match diagnostic.level {
            Level::ERROR => tracing::error!(code, "{message}"),
            Level::WARN => tracing::warn!(code, "{message}"),
            Level::INFO => tracing::info!(code, "{message}"),
            Level::DEBUG => tracing::debug!(code, "{message}"),
            Level::TRACE => tracing::trace!(code, "{message}"),
        }
    }
}

/// Keeps every diagnostic in memory. Meant for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }

    pub fn codes(&self) -> Vec<String> {
        self.diagnostics()
            .into_iter()
            .map(|d| d.code.into_owned())
            .collect()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.diagnostics().iter().any(|d| d.code == code)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, diagnostic: &Diagnostic) {
        if let Ok(mut records) = self.records.lock() {
            records.push(diagnostic.clone());
        }
    }
}

/// Cheap, cloneable handle that components use to report diagnostics.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    /// Handle backed by [`TracingSink`].
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Handle backed by a fresh [`MemorySink`], returned alongside it.
    pub fn memory() -> (Self, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (Self::new(sink.clone()), sink)
    }

    pub fn emit(
        &self,
        level: Level,
        code: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
    ) {
        self.sink.emit(&Diagnostic {
            level,
            code: code.into(),
            message: message.into(),
        });
    }

    pub fn error(&self, code: impl Into<Cow<'static, str>>, message: impl Into<String>) {
        self.emit(Level::ERROR, code, message);
    }

    pub fn warn(&self, code: impl Into<Cow<'static, str>>, message: impl Into<String>) {
        self.emit(Level::WARN, code, message);
    }

    pub fn info(&self, code: impl Into<Cow<'static, str>>, message: impl Into<String>) {
        self.emit(Level::INFO, code, message);
    }

    pub fn debug(&self, code: impl Into<Cow<'static, str>>, message: impl Into<String>) {
        self.emit(Level::DEBUG, code, message);
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::tracing()
    }
}
