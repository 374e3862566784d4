//! Diagnostics reported to the analysis platform.
//!
//! A diagnostic is a one-way notification: a [`DiagnosticKind`] from a
//! closed set plus a markdown message. Emitting one never fails the run.
//!
//! # Example
//!
//! ```
//! use go_autobuilder::diagnostics::{DiagnosticKind, DiagnosticSink, MockSink};
//!
//! let mut sink = MockSink::new();
//! sink.emit(DiagnosticKind::NoGoMod, "No `go.mod` file found.");
//!
//! assert!(sink.has(DiagnosticKind::NoGoMod));
//! ```

pub mod kind;
pub mod mock;
pub mod sink;

pub use kind::{DiagnosticKind, Severity, Visibility};
pub use mock::MockSink;
pub use sink::{default_sink, DiagnosticSink, JsonLinesSink, LogSink, MultiSink};
