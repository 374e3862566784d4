//! Scripted toolchain for testing.
//!
//! `MockToolchain` implements the [`Toolchain`] trait with pre-configured
//! answers and records every call for later assertion.
//!
//! # Example
//!
//! ```
//! use go_autobuilder::shell::EnvOverlay;
//! use go_autobuilder::toolchain::{MockToolchain, Toolchain};
//! use std::path::Path;
//!
//! let go = MockToolchain::new("1.20.3").with_dep_errors(true);
//!
//! assert!(go.dep_errors(Path::new("."), &EnvOverlay::default(), "./...", &[]));
//! assert_eq!(go.calls(), vec!["list ./...".to_string()]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::shell::EnvOverlay;

use super::version::GoVersion;
use super::Toolchain;

/// Mock toolchain implementation for testing.
#[derive(Debug)]
pub struct MockToolchain {
    program: PathBuf,
    version: GoVersion,
    dep_errors: bool,
    dep_error_answers: RefCell<VecDeque<bool>>,
    vendor_consistent: bool,
    set_go_directive_succeeds: bool,
    mod_tidy_succeeds: bool,
    calls: RefCell<Vec<String>>,
    envs: RefCell<Vec<EnvOverlay>>,
}

impl MockToolchain {
    /// Create a mock reporting `version`, with no dependency errors and a
    /// consistent vendor directory.
    ///
    /// # Panics
    ///
    /// Panics if `version` is not a valid Go version.
    pub fn new(version: &str) -> Self {
        Self {
            program: PathBuf::from("mock-go-that-does-not-exist"),
            version: GoVersion::parse(version).unwrap(),
            dep_errors: false,
            dep_error_answers: RefCell::new(VecDeque::new()),
            vendor_consistent: true,
            set_go_directive_succeeds: true,
            mod_tidy_succeeds: true,
            calls: RefCell::new(Vec::new()),
            envs: RefCell::new(Vec::new()),
        }
    }

    /// Set the program path returned by [`Toolchain::program`].
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Set whether dependency checks report errors.
    pub fn with_dep_errors(mut self, dep_errors: bool) -> Self {
        self.dep_errors = dep_errors;
        self
    }

    /// Answer successive dependency checks with `answers`, in order, before
    /// falling back to the value set by [`MockToolchain::with_dep_errors`].
    pub fn with_dep_error_answers(self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.dep_error_answers.borrow_mut().extend(answers);
        self
    }

    /// Set whether the vendor directory is consistent.
    pub fn with_vendor_consistent(mut self, consistent: bool) -> Self {
        self.vendor_consistent = consistent;
        self
    }

    /// Set whether `go mod edit -go=...` succeeds.
    pub fn with_set_go_directive(mut self, succeeds: bool) -> Self {
        self.set_go_directive_succeeds = succeeds;
        self
    }

    /// Set whether `go mod tidy -e` succeeds.
    pub fn with_mod_tidy(mut self, succeeds: bool) -> Self {
        self.mod_tidy_succeeds = succeeds;
        self
    }

    /// All calls made so far, rendered as `go` arguments.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Check if a call starting with `prefix` was made.
    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    /// Environment overlays passed to each call, in call order.
    pub fn envs(&self) -> Vec<EnvOverlay> {
        self.envs.borrow().clone()
    }

    fn record(&self, call: String, env: &EnvOverlay) {
        self.calls.borrow_mut().push(call);
        self.envs.borrow_mut().push(env.clone());
    }
}

impl Toolchain for MockToolchain {
    fn program(&self) -> &Path {
        &self.program
    }

    fn version(&self) -> &GoVersion {
        &self.version
    }

    fn dep_errors(&self, _cwd: &Path, env: &EnvOverlay, pattern: &str, flags: &[String]) -> bool {
        let mut call = String::from("list");
        for flag in flags {
            call.push(' ');
            call.push_str(flag);
        }
        call.push(' ');
        call.push_str(pattern);
        self.record(call, env);
        self.dep_error_answers
            .borrow_mut()
            .pop_front()
            .unwrap_or(self.dep_errors)
    }

    fn vendor_consistent(&self, _cwd: &Path, env: &EnvOverlay) -> bool {
        self.record("list -mod=vendor ./...".to_string(), env);
        self.vendor_consistent
    }

    fn set_go_directive(&self, _cwd: &Path, env: &EnvOverlay, version: &str) -> bool {
        self.record(format!("mod edit -go={}", version), env);
        self.set_go_directive_succeeds
    }

    fn mod_tidy(&self, _cwd: &Path, env: &EnvOverlay) -> bool {
        self.record("mod tidy -e".to_string(), env);
        self.mod_tidy_succeeds
    }
}
