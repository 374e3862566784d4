//! Keeping `go.mod` and `go.sum` in step with the source before building.
//!
//! From Go 1.16 on, package loading no longer updates `go.mod` and `go.sum`
//! on its own, so `go mod tidy -e` is run first.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use crate::detection::{ManifestProfile, ModuleMode};
use crate::shell::EnvOverlay;
use crate::toolchain::{GoVersion, Toolchain};

/// What `go mod tidy -e` changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TidyOutcome {
    pub succeeded: bool,
    pub go_mod_changed: bool,
    pub go_sum_changed: bool,
}

/// Whether `go mod tidy -e` should be run.
pub fn should_tidy(go: &GoVersion, profile: ManifestProfile, mode: ModuleMode) -> bool {
    mode != ModuleMode::Vendored
        && profile.is_module_based()
        && *go >= GoVersion::major_minor_only(1, 16)
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Run `go mod tidy -e` when needed and report which files it touched.
///
/// Returns `None` when tidying does not apply. Failures are logged.
pub fn tidy_go_mod(
    toolchain: &dyn Toolchain,
    profile: ManifestProfile,
    mode: ModuleMode,
    cwd: &Path,
    env: &EnvOverlay,
) -> Option<TidyOutcome> {
    if !should_tidy(toolchain.version(), profile, mode) {
        return None;
    }

    let go_mod = cwd.join("go.mod");
    let go_sum = cwd.join("go.sum");

    let go_mod_before = modified(&go_mod);
    if go_mod_before.is_none() {
        tracing::warn!("Failed to stat go.mod before running `go mod tidy -e`");
    }
    let go_sum_before = modified(&go_sum);

    if !toolchain.mod_tidy(cwd, env) {
        tracing::warn!("Failed to run `go mod tidy -e`");
        return Some(TidyOutcome::default());
    }

    let mut outcome = TidyOutcome {
        succeeded: true,
        ..TidyOutcome::default()
    };

    if let Some(before) = go_mod_before {
        match modified(&go_mod) {
            Some(after) => outcome.go_mod_changed = after > before,
            None => tracing::warn!("Failed to stat go.mod after running `go mod tidy -e`"),
        }
    }
    match modified(&go_sum) {
        Some(after) => {
            outcome.go_sum_changed = go_sum_before.map_or(true, |before| after > before)
        }
        None => tracing::debug!("No go.sum after running `go mod tidy -e`"),
    }

    if outcome.go_mod_changed {
        tracing::warn!(
            "We have run `go mod tidy -e` and it altered go.mod. You may wish to check these changes into version control."
        );
    }
    if outcome.go_sum_changed {
        tracing::warn!(
            "We have run `go mod tidy -e` and it altered go.sum. You may wish to check these changes into version control."
        );
    }

    Some(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolchain::MockToolchain;
    use tempfile::TempDir;

    #[test]
    fn tidy_requires_go_1_16() {
        let old = GoVersion::new(1, 15, 9);
        let new = GoVersion::new(1, 16, 0);

        assert!(!should_tidy(&old, ManifestProfile::ModuleBased, ModuleMode::Unset));
        assert!(should_tidy(&new, ManifestProfile::ModuleBased, ModuleMode::Unset));
    }

    #[test]
    fn tidy_skipped_for_vendored_and_non_module_projects() {
        let go = GoVersion::new(1, 20, 0);

        assert!(!should_tidy(&go, ManifestProfile::ModuleBased, ModuleMode::Vendored));
        assert!(!should_tidy(&go, ManifestProfile::DepBased, ModuleMode::Unset));
    }

    #[test]
    fn tidy_not_run_when_not_applicable() {
        let temp = TempDir::new().unwrap();
        let go = MockToolchain::new("1.15");

        let outcome = tidy_go_mod(
            &go,
            ManifestProfile::ModuleBased,
            ModuleMode::Unset,
            temp.path(),
            &EnvOverlay::default(),
        );

        assert_eq!(outcome, None);
        assert!(go.calls().is_empty());
    }

    #[test]
    fn unchanged_files_are_not_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("go.mod"), "module x\n").unwrap();
        fs::write(temp.path().join("go.sum"), "").unwrap();
        let go = MockToolchain::new("1.18");

        let outcome = tidy_go_mod(
            &go,
            ManifestProfile::ModuleBased,
            ModuleMode::AutoUpdate,
            temp.path(),
            &EnvOverlay::default(),
        )
        .unwrap();

        assert!(outcome.succeeded);
        assert!(!outcome.go_mod_changed);
        assert!(!outcome.go_sum_changed);
        assert_eq!(go.calls(), vec!["mod tidy -e"]);
    }

    #[test]
    fn new_go_sum_counts_as_changed() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("go.mod"), "module x\n").unwrap();

        struct CreatesGoSum(MockToolchain);
        impl Toolchain for CreatesGoSum {
            fn program(&self) -> &Path {
                self.0.program()
            }
            fn version(&self) -> &GoVersion {
                self.0.version()
            }
            fn dep_errors(&self, cwd: &Path, env: &EnvOverlay, p: &str, f: &[String]) -> bool {
                self.0.dep_errors(cwd, env, p, f)
            }
            fn vendor_consistent(&self, cwd: &Path, env: &EnvOverlay) -> bool {
                self.0.vendor_consistent(cwd, env)
            }
            fn set_go_directive(&self, cwd: &Path, env: &EnvOverlay, v: &str) -> bool {
                self.0.set_go_directive(cwd, env, v)
            }
            fn mod_tidy(&self, cwd: &Path, env: &EnvOverlay) -> bool {
                fs::write(cwd.join("go.sum"), "example.com/dep v1.0.0 h1:abc=\n").unwrap();
                self.0.mod_tidy(cwd, env)
            }
        }

        let outcome = tidy_go_mod(
            &CreatesGoSum(MockToolchain::new("1.20")),
            ManifestProfile::ModuleBased,
            ModuleMode::Unset,
            temp.path(),
            &EnvOverlay::default(),
        )
        .unwrap();

        assert!(outcome.go_sum_changed);
        assert!(!outcome.go_mod_changed);
    }

    #[test]
    fn failed_tidy_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("go.mod"), "module x\n").unwrap();
        let go = MockToolchain::new("1.20").with_mod_tidy(false);

        let outcome = tidy_go_mod(
            &go,
            ManifestProfile::ModuleBased,
            ModuleMode::Unset,
            temp.path(),
            &EnvOverlay::default(),
        )
        .unwrap();

        assert!(!outcome.succeeded);
    }
}
