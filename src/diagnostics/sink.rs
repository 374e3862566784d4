//! Diagnostic sinks.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{AutobuildError, Result};

use super::kind::{DiagnosticKind, Severity, Visibility};

/// Receives diagnostics.
///
/// Emitting never fails the run; sinks log their own problems.
pub trait DiagnosticSink {
    /// Report a diagnostic of `kind` with a markdown `message`.
    fn emit(&mut self, kind: DiagnosticKind, message: &str);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn emit(&mut self, kind: DiagnosticKind, message: &str) {
        (**self).emit(kind, message)
    }
}

/// Writes diagnostics to the log.
#[derive(Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&mut self, kind: DiagnosticKind, message: &str) {
        match kind.severity() {
            Severity::Note => tracing::debug!("[{}] {}", kind.id(), message),
            Severity::Warning => tracing::warn!("[{}] {}", kind.id(), message),
            Severity::Error => tracing::error!("[{}] {}", kind.id(), message),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticSource<'a> {
    id: &'a str,
    name: &'a str,
    extractor_name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiagnosticRecord<'a> {
    timestamp: DateTime<Utc>,
    source: DiagnosticSource<'a>,
    markdown_message: &'a str,
    severity: Severity,
    visibility: Visibility,
}

/// Appends one JSON object per diagnostic to a file in a diagnostics directory.
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    /// Create a sink writing to a new, timestamped file inside `dir`.
    ///
    /// The directory is created if needed. The file itself is only created
    /// when the first diagnostic is emitted.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| AutobuildError::filesystem("create diagnostics directory", dir, e))?;

        let name = format!(
            "autobuilder-{}-{}.jsonl",
            Utc::now().format("%Y%m%d%H%M%S%3f"),
            std::process::id()
        );
        Ok(Self {
            path: dir.join(name),
        })
    }

    /// File the diagnostics are written to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, kind: DiagnosticKind, message: &str) -> Result<()> {
        let record = DiagnosticRecord {
            timestamp: Utc::now(),
            source: DiagnosticSource {
                id: kind.id(),
                name: kind.name(),
                extractor_name: "go",
            },
            markdown_message: message,
            severity: kind.severity(),
            visibility: kind.visibility(),
        };
        let mut line = serde_json::to_string(&record).map_err(anyhow::Error::from)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| AutobuildError::filesystem("open diagnostics file", &self.path, e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| AutobuildError::filesystem("write diagnostics file", &self.path, e))?;
        Ok(())
    }
}

impl DiagnosticSink for JsonLinesSink {
    fn emit(&mut self, kind: DiagnosticKind, message: &str) {
        if let Err(e) = self.append(kind, message) {
            tracing::warn!("Failed to write diagnostic {}: {}", kind.id(), e);
        }
    }
}

/// Forwards every diagnostic to each of its sinks.
#[derive(Default)]
pub struct MultiSink {
    sinks: Vec<Box<dyn DiagnosticSink>>,
}

impl MultiSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn with(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl DiagnosticSink for MultiSink {
    fn emit(&mut self, kind: DiagnosticKind, message: &str) {
        for sink in &mut self.sinks {
            sink.emit(kind, message);
        }
    }
}

/// The sinks for a run: always the log, plus a JSON-lines file when a
/// diagnostics directory is configured.
///
/// A diagnostics directory that cannot be created is logged and skipped.
pub fn default_sink(diagnostic_dir: Option<&Path>) -> MultiSink {
    let mut sink = MultiSink::new().with(LogSink);
    if let Some(dir) = diagnostic_dir {
        match JsonLinesSink::create(dir) {
            Ok(file_sink) => {
                tracing::debug!("Writing diagnostics to {}", file_sink.path().display());
                sink = sink.with(file_sink);
            }
            Err(e) => tracing::warn!("Diagnostics will only be logged: {}", e),
        }
    }
    sink
}
