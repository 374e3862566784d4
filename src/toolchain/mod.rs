//! Go toolchain discovery, version parsing and `go` subcommands.
//!
//! # Modules
//!
//! - [`version`] - Version parsing and ordering
//! - [`lookup`] - Executable lookup on PATH
//! - [`go`] - The installed `go` command
//! - [`mock`] - A scripted toolchain for tests

pub mod go;
pub mod lookup;
pub mod mock;
pub mod version;

use std::path::Path;

use crate::shell::EnvOverlay;

pub use go::GoToolchain;
pub use lookup::{find_executable, resolve_tool_path};
pub use mock::MockToolchain;
pub use version::{parse_go_version_output, GoVersion};

/// The `go` operations the build needs.
///
/// This trait allows the build coordinator to run against a scripted
/// toolchain in tests.
pub trait Toolchain {
    /// Path of the `go` executable, used for `go get`.
    fn program(&self) -> &Path;

    /// Version reported by `go version`.
    fn version(&self) -> &GoVersion;

    /// Whether packages matching `pattern` still have dependency errors.
    ///
    /// A `go list` that cannot run counts as having errors.
    fn dep_errors(&self, cwd: &Path, env: &EnvOverlay, pattern: &str, flags: &[String]) -> bool;

    /// Whether `go list -mod=vendor ./...` accepts the vendor directory.
    ///
    /// Only an explicit "inconsistent vendoring" report counts as inconsistent.
    fn vendor_consistent(&self, cwd: &Path, env: &EnvOverlay) -> bool;

    /// Add a `go <version>` directive to `go.mod`.
    fn set_go_directive(&self, cwd: &Path, env: &EnvOverlay, version: &str) -> bool;

    /// Run `go mod tidy -e`.
    fn mod_tidy(&self, cwd: &Path, env: &EnvOverlay) -> bool;
}
