//! The installed `go` command.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AutobuildError, Result};
use crate::shell::{execute, CommandOptions, CommandRunner, EnvOverlay, SystemRunner};

use super::lookup::find_executable;
use super::version::{parse_go_version_output, GoVersion};
use super::Toolchain;

static INCONSISTENT_VENDORING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^go: inconsistent vendoring in .*:\r?$").unwrap());

/// Template that prints `error` for every package with dependency errors.
const DEPS_ERRORS_TEMPLATE: &str = "{{if .DepsErrors}}error{{else}}{{end}}";

/// A Go toolchain found in the environment, with its reported version.
#[derive(Debug, Clone)]
pub struct GoToolchain {
    program: PathBuf,
    version: GoVersion,
}

impl GoToolchain {
    /// Find `go` on PATH and query its version.
    ///
    /// Returns `Ok(None)` when no `go` binary is on PATH. A binary that is
    /// present but cannot report its version is an error.
    pub fn detect() -> Result<Option<Self>> {
        match find_executable("go") {
            Some(program) => Self::from_program(program).map(Some),
            None => Ok(None),
        }
    }

    /// Like [`GoToolchain::detect`], but a missing toolchain is an error.
    pub fn require() -> Result<Self> {
        Self::detect()?.ok_or_else(|| AutobuildError::ToolchainUnavailable {
            message: "no `go` executable found on PATH".to_string(),
        })
    }

    /// Run `<program> version` and parse the result.
    pub fn from_program(program: PathBuf) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let options = CommandOptions::captured(&cwd, &EnvOverlay::default());

        let result = execute(&program, &["version"], &options).map_err(|e| {
            AutobuildError::ToolchainUnavailable {
                message: e.to_string(),
            }
        })?;
        if !result.success {
            return Err(AutobuildError::ToolchainUnavailable {
                message: format!(
                    "`go version` exited with {:?}: {}",
                    result.exit_code,
                    result.output.trim()
                ),
            });
        }

        let version = parse_go_version_output(&result.output)?;
        tracing::debug!("Found go {} at {}", version, program.display());
        Ok(Self { program, version })
    }

    /// Run `go <args>` with captured output, logged by the runner.
    fn run_check(&self, args: &[&str], cwd: &Path, env: &EnvOverlay) -> bool {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        SystemRunner.run_check(
            self.program.as_os_str(),
            &args,
            &CommandOptions::captured(cwd, env),
        )
    }
}

impl Toolchain for GoToolchain {
    fn program(&self) -> &Path {
        &self.program
    }

    fn version(&self) -> &GoVersion {
        &self.version
    }

    fn dep_errors(&self, cwd: &Path, env: &EnvOverlay, pattern: &str, flags: &[String]) -> bool {
        let mut args = vec![
            "list".to_string(),
            "-e".to_string(),
            "-f".to_string(),
            DEPS_ERRORS_TEMPLATE.to_string(),
        ];
        args.extend(flags.iter().cloned());
        args.push(pattern.to_string());

        match execute(&self.program, &args, &CommandOptions::captured(cwd, env)) {
            Ok(result) if result.success => result.output.contains("error"),
            Ok(result) => {
                tracing::debug!("`go list` failed: {}", result.output.trim());
                true
            }
            Err(e) => {
                tracing::warn!("Unable to check for dependency errors: {}", e);
                true
            }
        }
    }

    fn vendor_consistent(&self, cwd: &Path, env: &EnvOverlay) -> bool {
        let args = ["list", "-mod=vendor", "./..."];
        match execute(&self.program, &args, &CommandOptions::captured(cwd, env)) {
            Ok(result) if !result.success => !INCONSISTENT_VENDORING.is_match(&result.output),
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Unable to check vendor directory: {}", e);
                true
            }
        }
    }

    fn set_go_directive(&self, cwd: &Path, env: &EnvOverlay, version: &str) -> bool {
        self.run_check(&["mod", "edit", &format!("-go={}", version)], cwd, env)
    }

    fn mod_tidy(&self, cwd: &Path, env: &EnvOverlay) -> bool {
        self.run_check(&["mod", "tidy", "-e"], cwd, env)
    }
}
