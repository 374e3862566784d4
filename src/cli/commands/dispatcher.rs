//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing the selected mode

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Mode};
use crate::config::Config;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;

/// Trait for command implementations.
pub trait Command {
    /// Execute the command, reporting diagnostics to `sink`.
    fn execute(&self, sink: &mut dyn DiagnosticSink) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self { exit_code: 0 }
    }

    /// The exit status for the process. Codes that do not fit in a `u8`
    /// become 1 so that a failure never turns into success.
    pub fn exit_status(&self) -> u8 {
        match u8::try_from(self.exit_code) {
            Ok(code) => code,
            Err(_) => 1,
        }
    }
}

/// Dispatches the selected mode to its command.
pub struct CommandDispatcher {
    config: Config,
    working_dir: PathBuf,
}

impl CommandDispatcher {
    /// Create a dispatcher. `working_dir` is where `--identify-environment`
    /// looks for a `go.mod`.
    pub fn new(config: Config, working_dir: PathBuf) -> Self {
        Self {
            config,
            working_dir,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Dispatch and execute the command for `cli`.
    pub fn dispatch(&self, cli: &Cli, sink: &mut dyn DiagnosticSink) -> Result<CommandResult> {
        match cli.mode() {
            Mode::Build => {
                let cmd = super::build::BuildCommand::new(&self.config);
                cmd.execute(sink)
            }
            Mode::IdentifyEnvironment => {
                let cmd = super::identify::IdentifyCommand::new(&self.config, &self.working_dir);
                cmd.execute(sink)
            }
        }
    }
}
