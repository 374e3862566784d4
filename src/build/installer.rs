//! Dependency installation per install strategy.

use std::ffi::OsString;
use std::fs;
use std::path::Path;

use crate::detection::InstallStrategy;
use crate::shell::{CommandOptions, CommandRunner, EnvOverlay};

/// How long dep may reuse cached sources: 30 days.
pub const DEP_CACHE_AGE: &str = "720h";

/// The command that installs dependencies for `strategy`.
pub fn install_command(strategy: InstallStrategy, go_program: &Path) -> (OsString, Vec<String>) {
    let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    match strategy {
        InstallStrategy::DepEnsure { vendor_only: true } => {
            ("dep".into(), args(&["ensure", "-v", "-vendor-only"]))
        }
        InstallStrategy::DepEnsure { vendor_only: false } => {
            ("dep".into(), args(&["ensure", "-v"]))
        }
        InstallStrategy::GlideInstall => ("glide".into(), args(&["install"])),
        InstallStrategy::ModuleSync | InstallStrategy::GoGet => (
            go_program.as_os_str().to_os_string(),
            args(&["get", "-v", "./..."]),
        ),
    }
}

/// Point dep at a shared cache under `<cache_dir>/go/dep`.
///
/// A cache directory that cannot be created is logged and skipped.
fn configure_dep_cache(cache_dir: &Path, env: &mut EnvOverlay) {
    let dep_cache = cache_dir.join("go").join("dep");
    tracing::info!("Attempting to create dep cache dir {}", dep_cache.display());
    if let Err(e) = fs::create_dir_all(&dep_cache) {
        tracing::warn!("Failed to create dep cache directory: {}", e);
        return;
    }
    tracing::info!("Setting dep cache directory to {}", dep_cache.display());
    env.set("DEPCACHEDIR", dep_cache.to_string_lossy());
    env.set("DEPCACHEAGE", DEP_CACHE_AGE);
}

/// Install dependencies with `strategy`, running in `cwd`.
///
/// Variables the installer needs (`GO111MODULE`, dep's cache settings) are
/// added to `env` and stay in effect for the rest of the run. A failed
/// install is logged; the build continues either way.
pub fn install_dependencies(
    runner: &dyn CommandRunner,
    strategy: InstallStrategy,
    go_program: &Path,
    cwd: &Path,
    cache_dir: Option<&Path>,
    env: &mut EnvOverlay,
) -> bool {
    match strategy {
        InstallStrategy::DepEnsure { .. } => {
            if let Some(cache_dir) = cache_dir {
                configure_dep_cache(cache_dir, env);
            }
            tracing::info!("Installing dependencies using `dep ensure`.");
        }
        InstallStrategy::GlideInstall => {
            tracing::info!("Installing dependencies using `glide install`.");
        }
        InstallStrategy::ModuleSync => {
            env.set("GO111MODULE", "on");
            tracing::info!("Installing dependencies using `go get -v ./...`.");
        }
        InstallStrategy::GoGet => {
            env.set("GO111MODULE", "off");
            tracing::info!("Installing dependencies using `go get -v ./...`.");
        }
    }

    let (program, args) = install_command(strategy, go_program);
    let success = runner.run_check(&program, &args, &CommandOptions::inherited(cwd, env));
    if !success {
        tracing::warn!("Dependency installation with {} failed; continuing.", strategy);
    }
    success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use tempfile::TempDir;

    fn go() -> &'static Path {
        Path::new("/usr/local/go/bin/go")
    }

    #[test]
    fn dep_with_lock_file_only_vendors() {
        let (program, args) = install_command(InstallStrategy::DepEnsure { vendor_only: true }, go());

        assert_eq!(program, "dep");
        assert_eq!(args, vec!["ensure", "-v", "-vendor-only"]);
    }

    #[test]
    fn dep_without_lock_file() {
        let (_, args) = install_command(InstallStrategy::DepEnsure { vendor_only: false }, go());
        assert_eq!(args, vec!["ensure", "-v"]);
    }

    #[test]
    fn go_get_uses_the_detected_go() {
        let (program, args) = install_command(InstallStrategy::GoGet, go());

        assert_eq!(program, go().as_os_str());
        assert_eq!(args, vec!["get", "-v", "./..."]);
    }

    #[test]
    fn module_sync_enables_modules() {
        let runner = MockRunner::new();
        let mut env = EnvOverlay::new("test");

        install_dependencies(
            &runner,
            InstallStrategy::ModuleSync,
            go(),
            Path::new("/src"),
            None,
            &mut env,
        );

        assert_eq!(env.get("GO111MODULE"), Some("on"));
        assert_eq!(runner.lines(), vec!["go get -v ./..."]);
        assert_eq!(runner.calls()[0].env.get("GO111MODULE"), Some("on"));
    }

    #[test]
    fn legacy_go_get_disables_modules() {
        let runner = MockRunner::new();
        let mut env = EnvOverlay::new("test");

        install_dependencies(&runner, InstallStrategy::GoGet, go(), Path::new("/src"), None, &mut env);

        assert_eq!(env.get("GO111MODULE"), Some("off"));
    }

    #[test]
    fn dep_uses_shared_cache() {
        let cache = TempDir::new().unwrap();
        let runner = MockRunner::new();
        let mut env = EnvOverlay::new("test");

        install_dependencies(
            &runner,
            InstallStrategy::DepEnsure { vendor_only: true },
            go(),
            Path::new("/src"),
            Some(cache.path()),
            &mut env,
        );

        let dep_cache = cache.path().join("go").join("dep");
        assert!(dep_cache.is_dir());
        assert_eq!(env.get("DEPCACHEDIR"), Some(&*dep_cache.to_string_lossy()));
        assert_eq!(env.get("DEPCACHEAGE"), Some("720h"));
        assert_eq!(runner.lines(), vec!["dep ensure -v -vendor-only"]);
    }

    #[test]
    fn unusable_cache_is_skipped() {
        let cache = TempDir::new().unwrap();
        let blocker = cache.path().join("file");
        fs::write(&blocker, "").unwrap();
        let runner = MockRunner::new();
        let mut env = EnvOverlay::new("test");

        install_dependencies(
            &runner,
            InstallStrategy::DepEnsure { vendor_only: false },
            go(),
            Path::new("/src"),
            Some(&blocker),
            &mut env,
        );

        assert!(!env.contains("DEPCACHEDIR"));
        assert!(runner.ran("dep"));
    }

    #[test]
    fn failed_install_is_reported() {
        let runner = MockRunner::new().with_exit_code("glide", 1);
        let mut env = EnvOverlay::new("test");

        assert!(!install_dependencies(
            &runner,
            InstallStrategy::GlideInstall,
            go(),
            Path::new("/src"),
            None,
            &mut env,
        ));
    }
}
