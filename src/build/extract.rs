//! Handing the prepared tree to the extractor.

use std::path::{Path, PathBuf};

use crate::detection::{ManifestProfile, ModuleMode};
use crate::error::{AutobuildError, Result};
use crate::shell::{display_command, CommandOptions, CommandRunner, EnvOverlay};
use crate::toolchain::lookup::{executable_name, parse_system_path, resolve_tool_path};
use crate::toolchain::GoVersion;

/// Base name of the extractor binary.
pub const EXTRACTOR_NAME: &str = "go-extractor";

/// Locate the extractor: next to the running executable, else on PATH.
pub fn find_extractor() -> Result<PathBuf> {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    find_extractor_in(exe_dir.as_deref(), &parse_system_path())
}

/// Locate the extractor in `exe_dir` first, then in `path_entries`.
pub fn find_extractor_in(exe_dir: Option<&Path>, path_entries: &[PathBuf]) -> Result<PathBuf> {
    if let Some(dir) = exe_dir {
        let candidate = dir.join(executable_name(EXTRACTOR_NAME));
        if candidate.is_file() {
            return Ok(candidate);
        }
    }
    resolve_tool_path(EXTRACTOR_NAME, path_entries).ok_or_else(|| {
        AutobuildError::ExtractorNotFound {
            message: format!(
                "{} was found neither next to the autobuilder nor on PATH",
                executable_name(EXTRACTOR_NAME)
            ),
        }
    })
}

/// Extractor arguments: the module flags (module projects only), then `./...`.
pub fn extractor_args(profile: ManifestProfile, mode: ModuleMode, go: &GoVersion) -> Vec<String> {
    let mut args = if profile.is_module_based() {
        mode.flags(go)
    } else {
        Vec::new()
    };
    args.push("./...".to_string());
    args
}

/// Run the extractor in `cwd` with inherited output. A failed extraction
/// is an error.
pub fn run_extractor(
    runner: &dyn CommandRunner,
    extractor: &Path,
    args: &[String],
    cwd: &Path,
    env: &EnvOverlay,
) -> Result<()> {
    let rendered = display_command(extractor, args);
    tracing::info!(
        "Running extractor command '{}' from directory '{}'.",
        rendered,
        cwd.display()
    );

    let result = runner.run(
        extractor.as_os_str(),
        args,
        &CommandOptions::inherited(cwd, env),
    )?;
    if !result.success {
        return Err(AutobuildError::CommandFailed {
            command: rendered,
            code: result.exit_code,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use std::fs;
    use tempfile::TempDir;

    fn fake_binary(dir: &Path) -> PathBuf {
        let path = dir.join(executable_name(EXTRACTOR_NAME));
        fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[test]
    fn extractor_next_to_executable_wins() {
        let exe_dir = TempDir::new().unwrap();
        let path_dir = TempDir::new().unwrap();
        let expected = fake_binary(exe_dir.path());
        fake_binary(path_dir.path());

        let found =
            find_extractor_in(Some(exe_dir.path()), &[path_dir.path().to_path_buf()]).unwrap();

        assert_eq!(found, expected);
    }

    #[test]
    fn extractor_on_path() {
        let exe_dir = TempDir::new().unwrap();
        let path_dir = TempDir::new().unwrap();
        let expected = fake_binary(path_dir.path());

        let found =
            find_extractor_in(Some(exe_dir.path()), &[path_dir.path().to_path_buf()]).unwrap();

        assert_eq!(found, expected);
    }

    #[test]
    fn missing_extractor_is_an_error() {
        let err = find_extractor_in(None, &[]).unwrap_err();
        assert!(matches!(err, AutobuildError::ExtractorNotFound { .. }));
    }

    #[test]
    fn module_projects_pass_mode_flags() {
        let go = GoVersion::new(1, 20, 0);

        assert_eq!(
            extractor_args(ManifestProfile::ModuleBased, ModuleMode::Vendored, &go),
            vec!["-mod=vendor", "./..."]
        );
        assert_eq!(
            extractor_args(ManifestProfile::ModuleBased, ModuleMode::Unset, &go),
            vec!["./..."]
        );
    }

    #[test]
    fn other_projects_never_pass_mode_flags() {
        let go = GoVersion::new(1, 20, 0);
        assert_eq!(
            extractor_args(ManifestProfile::DepBased, ModuleMode::Vendored, &go),
            vec!["./..."]
        );
    }

    #[test]
    fn failed_extraction_is_fatal() {
        let runner = MockRunner::new().with_exit_code(EXTRACTOR_NAME, 3);

        let err = run_extractor(
            &runner,
            Path::new("/opt/go-extractor"),
            &["./...".to_string()],
            Path::new("/src"),
            &EnvOverlay::default(),
        )
        .unwrap_err();

        assert!(matches!(err, AutobuildError::CommandFailed { code: Some(3), .. }));
    }

    #[test]
    fn successful_extraction() {
        let runner = MockRunner::new();

        run_extractor(
            &runner,
            Path::new("/opt/go-extractor"),
            &["-mod=mod".to_string(), "./...".to_string()],
            Path::new("/src"),
            &EnvOverlay::default(),
        )
        .unwrap();

        assert_eq!(runner.lines(), vec!["go-extractor -mod=mod ./..."]);
        assert_eq!(runner.calls()[0].cwd.as_deref(), Some(Path::new("/src")));
    }
}
