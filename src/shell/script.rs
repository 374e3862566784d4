//! Custom build command scripts.
//!
//! A user-supplied build command is a newline-separated list of shell
//! commands. It is written to a temporary script with command tracing and
//! an early exit on failure, then run once.

use std::io::Write;
use std::path::Path;

use crate::error::{AutobuildError, Result};

use super::command::CommandOptions;
use super::env::EnvOverlay;
use super::runner::CommandRunner;

/// Script flavour for the current platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// `#! /bin/bash` with `set -xe +u`.
    Bash,
    /// Windows batch file with echo on and an error-level guard.
    Batch,
}

impl ScriptKind {
    /// The script kind for the platform this binary was built for.
    pub fn native() -> Self {
        if cfg!(target_os = "windows") {
            ScriptKind::Batch
        } else {
            ScriptKind::Bash
        }
    }

    /// File extension, including the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ScriptKind::Bash => ".sh",
            ScriptKind::Batch => ".cmd",
        }
    }

    /// Wrap the user's commands in this script kind's header and footer.
    pub fn render(self, commands: &str) -> String {
        match self {
            ScriptKind::Bash => format!("#! /bin/bash\nset -xe +u\n{}", commands),
            ScriptKind::Batch => format!(
                "@echo on\n@prompt +$S\n{}\nIF %ERRORLEVEL% NEQ 0 EXIT",
                commands
            ),
        }
    }
}

/// Write `commands` to a temporary script and run it in `cwd`.
///
/// Returns whether the script succeeded. Failures of the script itself are
/// only logged; failing to create the script is an error.
pub fn run_build_script(
    runner: &dyn CommandRunner,
    commands: &str,
    cwd: &Path,
    env: &EnvOverlay,
) -> Result<bool> {
    let kind = ScriptKind::native();

    let mut script = tempfile::Builder::new()
        .prefix("go-build-command-")
        .suffix(kind.extension())
        .tempfile()
        .map_err(|e| {
            AutobuildError::filesystem("create build script in", std::env::temp_dir(), e)
        })?;

    script
        .write_all(kind.render(commands).as_bytes())
        .map_err(|e| AutobuildError::filesystem("write build script", script.path(), e))?;

    // The handle must be closed before the script is executed.
    let script = script.into_temp_path();
    make_executable(&script);

    tracing::info!("Installing dependencies using custom build command.");
    let success = runner.run_check(script.as_os_str(), &[], &CommandOptions::inherited(cwd, env));
    if !success {
        tracing::warn!("Custom build command failed; continuing.");
    }

    if let Err(e) = script.close() {
        tracing::warn!("Failed to remove temporary build script: {}", e);
    }

    Ok(success)
}

#[cfg(unix)]
fn make_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(e) = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700)) {
        tracing::warn!("Failed to make {} executable: {}", path.display(), e);
    }
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) {}
