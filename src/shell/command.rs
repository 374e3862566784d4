//! External command execution.

use crate::error::{AutobuildError, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::env::EnvOverlay;

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Captured standard output followed by standard error.
    ///
    /// Empty when output was inherited from the parent.
    pub output: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(output: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            output,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: Option<i32>, output: String, duration: Duration) -> Self {
        Self {
            exit_code,
            output,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,

    /// Environment overrides (merged with the inherited environment).
    pub env: EnvOverlay,

    /// Capture output (if false, inherits stdout/stderr from the parent).
    pub capture_output: bool,
}

impl CommandOptions {
    /// Options that capture output, running in `cwd` with `env` applied.
    pub fn captured(cwd: &Path, env: &EnvOverlay) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
            env: env.clone(),
            capture_output: true,
        }
    }

    /// Options that stream output to the parent's stdout/stderr.
    pub fn inherited(cwd: &Path, env: &EnvOverlay) -> Self {
        Self {
            cwd: Some(cwd.to_path_buf()),
            env: env.clone(),
            capture_output: false,
        }
    }
}

/// Render a program and its arguments for log messages.
pub fn display_command<P, S>(program: P, args: &[S]) -> String
where
    P: AsRef<OsStr>,
    S: AsRef<str>,
{
    let mut rendered = Path::new(program.as_ref()).display().to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg.as_ref());
    }
    rendered
}

/// Execute `program` with `args` and wait for it to finish.
///
/// Returns `Err` only if the process could not be started; a non-zero exit
/// is reported through [`CommandResult::success`].
pub fn execute<P, S>(program: P, args: &[S], options: &CommandOptions) -> Result<CommandResult>
where
    P: AsRef<OsStr>,
    S: AsRef<OsStr> + AsRef<str>,
{
    let start = Instant::now();
    let rendered = display_command(&program, args);

    let mut cmd = Command::new(program.as_ref());
    for arg in args {
        cmd.arg(AsRef::<OsStr>::as_ref(arg));
    }

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    options.env.apply(&mut cmd);

    if options.capture_output {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Running '{}'", rendered);

    let output = cmd.output().map_err(|e| {
        tracing::debug!("Failed to start '{}': {}", rendered, e);
        AutobuildError::CommandFailed {
            command: rendered.clone(),
            code: None,
        }
    })?;

    let duration = start.elapsed();

    let combined = if options.capture_output {
        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        text
    } else {
        String::new()
    };

    if output.status.success() {
        Ok(CommandResult::success(combined, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            combined,
            duration,
        ))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sh(script: &str, options: &CommandOptions) -> CommandResult {
        execute("sh", &["-c", script], options).unwrap()
    }

    #[test]
    fn execute_successful_command() {
        let temp = TempDir::new().unwrap();
        let options = CommandOptions::captured(temp.path(), &EnvOverlay::default());

        let result = sh("echo hello", &options);

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.output.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let temp = TempDir::new().unwrap();
        let options = CommandOptions::captured(temp.path(), &EnvOverlay::default());

        let result = sh("exit 3", &options);

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_captures_stderr_after_stdout() {
        let temp = TempDir::new().unwrap();
        let options = CommandOptions::captured(temp.path(), &EnvOverlay::default());

        let result = sh("echo out; echo err >&2", &options);

        assert_eq!(result.output, "out\nerr\n");
    }

    #[test]
    fn execute_applies_env_overlay() {
        let temp = TempDir::new().unwrap();
        let mut env = EnvOverlay::new("test");
        env.set("AUTOBUILD_TEST_VAR", "overlay_value");
        let options = CommandOptions::captured(temp.path(), &env);

        let result = sh("echo $AUTOBUILD_TEST_VAR", &options);

        assert!(result.output.contains("overlay_value"));
    }

    #[test]
    fn execute_runs_in_cwd() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("marker.txt"), "").unwrap();
        let options = CommandOptions::captured(temp.path(), &EnvOverlay::default());

        let result = sh("ls", &options);

        assert!(result.output.contains("marker.txt"));
    }

    #[test]
    fn execute_missing_program_is_an_error() {
        let temp = TempDir::new().unwrap();
        let options = CommandOptions::captured(temp.path(), &EnvOverlay::default());

        let result = execute("definitely-not-a-real-program-xyz", &["--version"], &options);

        assert!(matches!(
            result,
            Err(AutobuildError::CommandFailed { code: None, .. })
        ));
    }

    #[test]
    fn display_command_joins_arguments() {
        assert_eq!(
            display_command("go", &["list", "-mod=vendor", "./..."]),
            "go list -mod=vendor ./..."
        );
    }
}
