//! Go autobuilder - prepares a Go project for code extraction.
//!
//! The autobuilder inspects a Go source tree, decides which Go toolchain it
//! needs, installs its dependencies with the right tool, and hands the tree
//! to the extractor. Projects without module support are temporarily moved
//! into a synthetic GOPATH and put back afterwards.
//!
//! # Modules
//!
//! - [`build`] - Build sequence, dependency installers and extraction
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loaded from environment variables
//! - [`detection`] - Manifest, install strategy and import path detection
//! - [`diagnostics`] - Diagnostics reported to the analysis platform
//! - [`environment`] - Which Go version the environment should provide
//! - [`error`] - Error types and result aliases
//! - [`shell`] - External command execution
//! - [`toolchain`] - Go toolchain probing and version parsing
//! - [`workspace`] - Temporary GOPATH layout
//!
//! # Example
//!
//! ```
//! use go_autobuilder::environment::VersionRequirement;
//! use go_autobuilder::toolchain::parse_go_version_output;
//!
//! let installed = parse_go_version_output("go version go1.14.2 linux/amd64").unwrap();
//! let requirement = VersionRequirement::resolve(None, Some(&installed));
//!
//! // Without a go.mod the installed toolchain is left alone.
//! assert!(requirement.version.is_none());
//! ```

pub mod build;
pub mod cli;
pub mod config;
pub mod detection;
pub mod diagnostics;
pub mod environment;
pub mod error;
pub mod shell;
pub mod toolchain;
pub mod workspace;

pub use error::{AutobuildError, Result};
