//! The seam through which the build runs external tools.
//!
//! [`SystemRunner`] spawns real processes. [`MockRunner`] records what would
//! have been run and returns scripted results, so build logic can be tested
//! without `make`, `dep` or an extractor installed.

use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::Result;

use super::command::{display_command, execute, CommandOptions, CommandResult};
use super::env::EnvOverlay;

/// Runs external commands.
pub trait CommandRunner {
    /// Run `program` with `args`. `Err` means the process could not start.
    fn run(&self, program: &OsStr, args: &[String], options: &CommandOptions)
        -> Result<CommandResult>;

    /// Run a command, logging captured output and failures, and return
    /// whether it succeeded.
    fn run_check(&self, program: &OsStr, args: &[String], options: &CommandOptions) -> bool {
        let rendered = display_command(program, args);
        match self.run(program, args, options) {
            Ok(result) => {
                if !result.output.is_empty() {
                    tracing::info!("{}", result.output.trim_end());
                }
                if !result.success {
                    tracing::warn!(
                        "Running '{}' failed with exit code {:?}",
                        rendered,
                        result.exit_code
                    );
                }
                result.success
            }
            Err(e) => {
                tracing::warn!("Running '{}' failed: {}", rendered, e);
                false
            }
        }
    }
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &OsStr,
        args: &[String],
        options: &CommandOptions,
    ) -> Result<CommandResult> {
        execute(program, args, options)
    }
}

/// A command seen by [`MockRunner`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    /// File name of the program (`make`, `go-extractor`, ...).
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: EnvOverlay,
}

impl RecordedCommand {
    /// `program arg1 arg2 ...`.
    pub fn line(&self) -> String {
        display_command(&self.program, &self.args)
    }
}

/// Runner that records commands and returns scripted exit codes.
///
/// Programs are matched by file name. Unscripted programs succeed.
///
/// # Example
///
/// ```
/// use go_autobuilder::shell::{CommandOptions, CommandRunner, MockRunner};
/// use std::ffi::OsStr;
///
/// let runner = MockRunner::new().with_exit_code("make", 2);
///
/// assert!(!runner.run_check(OsStr::new("make"), &[], &CommandOptions::default()));
/// assert!(runner.run_check(OsStr::new("/usr/bin/ninja"), &[], &CommandOptions::default()));
/// assert_eq!(runner.lines(), vec!["make", "ninja"]);
/// ```
#[derive(Debug, Default)]
pub struct MockRunner {
    exit_codes: HashMap<String, i32>,
    unavailable: Vec<String>,
    calls: RefCell<Vec<RecordedCommand>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` exit with `code`.
    pub fn with_exit_code(mut self, program: &str, code: i32) -> Self {
        self.exit_codes.insert(program.to_string(), code);
        self
    }

    /// Make `program` fail to start, as if it were not installed.
    pub fn with_unavailable(mut self, program: &str) -> Self {
        self.unavailable.push(program.to_string());
        self
    }

    /// Every command run so far.
    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.borrow().clone()
    }

    /// Every command run so far, rendered as command lines.
    pub fn lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(RecordedCommand::line).collect()
    }

    /// Check if `program` was run.
    pub fn ran(&self, program: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.program == program)
    }
}

fn program_name(program: &OsStr) -> String {
    Path::new(program)
        .file_name()
        .unwrap_or(program)
        .to_string_lossy()
        .into_owned()
}

impl CommandRunner for MockRunner {
    fn run(
        &self,
        program: &OsStr,
        args: &[String],
        options: &CommandOptions,
    ) -> Result<CommandResult> {
        let name = program_name(program);
        self.calls.borrow_mut().push(RecordedCommand {
            program: name.clone(),
            args: args.to_vec(),
            cwd: options.cwd.clone(),
            env: options.env.clone(),
        });

        if self.unavailable.contains(&name) {
            return Err(crate::error::AutobuildError::CommandFailed {
                command: display_command(&name, args),
                code: None,
            });
        }

        match self.exit_codes.get(&name) {
            Some(&code) if code != 0 => {
                Ok(CommandResult::failure(Some(code), String::new(), Duration::ZERO))
            }
            _ => Ok(CommandResult::success(String::new(), Duration::ZERO)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_records_cwd_and_env() {
        let runner = MockRunner::new();
        let env = EnvOverlay::new("test").with("GO111MODULE", "off");
        let options = CommandOptions::captured(Path::new("/src"), &env);

        runner.run_check(OsStr::new("go"), &["get".to_string()], &options);

        let calls = runner.calls();
        assert_eq!(calls[0].cwd, Some(PathBuf::from("/src")));
        assert_eq!(calls[0].env.get("GO111MODULE"), Some("off"));
        assert_eq!(calls[0].line(), "go get");
    }

    #[test]
    fn unavailable_program_fails_to_start() {
        let runner = MockRunner::new().with_unavailable("dep");

        assert!(runner
            .run(OsStr::new("dep"), &[], &CommandOptions::default())
            .is_err());
        assert!(!runner.run_check(OsStr::new("dep"), &[], &CommandOptions::default()));
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_runs_processes() {
        let runner = SystemRunner;
        let options = CommandOptions::captured(Path::new("/"), &EnvOverlay::default());

        assert!(runner.run_check(OsStr::new("true"), &[], &options));
        assert!(!runner.run_check(OsStr::new("false"), &[], &options));
    }
}
