//! Recording sink for tests.

use super::kind::DiagnosticKind;
use super::sink::DiagnosticSink;

/// Sink that keeps every diagnostic for later assertion.
#[derive(Debug, Default, Clone)]
pub struct MockSink {
    emitted: Vec<(DiagnosticKind, String)>,
}

impl MockSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, in order.
    pub fn emitted(&self) -> &[(DiagnosticKind, String)] {
        &self.emitted
    }

    /// Kinds emitted so far, in order.
    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.emitted.iter().map(|(kind, _)| *kind).collect()
    }

    /// Check if a diagnostic of `kind` was emitted.
    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.emitted.iter().any(|(k, _)| *k == kind)
    }
}

impl DiagnosticSink for MockSink {
    fn emit(&mut self, kind: DiagnosticKind, message: &str) {
        self.emitted.push((kind, message.to_string()));
    }
}
