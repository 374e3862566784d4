//! Environment overlays for child processes.
//!
//! The autobuilder never mutates its own process environment. Variables
//! such as `GOPATH`, `GO111MODULE` and `SEMMLE_PATH_TRANSFORMER` are
//! collected in an [`EnvOverlay`] and applied to each child command.

use std::collections::BTreeMap;
use std::process::Command;

/// Variables applied on top of the inherited environment of a child process.
///
/// # Example
///
/// ```
/// use go_autobuilder::shell::EnvOverlay;
///
/// let mut env = EnvOverlay::new("build");
/// env.set("GO111MODULE", "auto");
/// env.set("GOPATH", "/src/root");
///
/// assert_eq!(env.get("GOPATH"), Some("/src/root"));
/// assert_eq!(env.source, "build");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverlay {
    /// Variables in this overlay, ordered for stable logging.
    pub vars: BTreeMap<String, String>,
    /// Where the overlay came from (for debugging).
    pub source: String,
}

impl EnvOverlay {
    /// Create an empty overlay with the given source name.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            vars: BTreeMap::new(),
            source: source.into(),
        }
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        tracing::debug!("{}: {}={}", self.source, key, value);
        self.vars.insert(key, value);
    }

    /// Get a variable's value in this overlay.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Check if this overlay has a variable.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// Return a copy of this overlay with one more variable set.
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.set(key, value);
        copy
    }

    /// Apply every variable to a command.
    pub fn apply(&self, cmd: &mut Command) {
        for (key, value) in &self.vars {
            cmd.env(key, value);
        }
    }

    /// Get the number of variables in this overlay.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Check if this overlay is empty.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
