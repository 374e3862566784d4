//! The build retry coordinator.
//!
//! Drives one autobuild run from manifest inspection to extraction:
//!
//! ```text
//! Init -> DefaultBuildAttempted -> DependencyInstallSkipped | DependencyInstallRan
//!      -> VendorRechecked -> Extracted
//! ```
//!
//! The default build is tried first. Dependencies are installed only when it
//! fails or leaves dependency errors behind, and never over a vendor
//! directory. A custom build command replaces both steps.

use std::path::{Path, PathBuf};

use crate::config::{vars, Config};
use crate::detection::{
    discover_import_path, fix_vendor_issues, needs_workspace, read_go_directive, select,
    InstallStrategy, ManifestProfile, ModuleMode,
};
use crate::diagnostics::DiagnosticSink;
use crate::environment::check_toolchain_is_new_enough;
use crate::error::Result;
use crate::shell::{run_build_script, CommandRunner, EnvOverlay};
use crate::toolchain::Toolchain;
use crate::workspace::{relocate, RelocatedWorkspace};

use super::autobuild::autobuild;
use super::extract::{extractor_args, find_extractor, run_extractor};
use super::gomod::{tidy_go_mod, TidyOutcome};
use super::installer::install_dependencies;

/// Where a run is in the build sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Init,
    DefaultBuildAttempted,
    CustomBuildRan,
    DependencyInstallSkipped,
    DependencyInstallRan,
    VendorRechecked,
    Extracted,
}

/// What the run decided about the project.
#[derive(Debug, Clone, PartialEq)]
pub struct RunDecision {
    pub profile: ManifestProfile,
    pub strategy: InstallStrategy,
    /// Chosen at selection; may be downgraded once by the vendor recheck.
    pub module_mode: ModuleMode,
    pub needs_workspace: bool,
    /// Set once, from the outcome of the default build.
    pub should_install_deps: bool,
}

/// Summary of a completed run.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub decision: RunDecision,
    /// States visited, in order.
    pub states: Vec<BuildState>,
    pub import_path: Option<String>,
    /// Whether the tree was moved into a synthetic GOPATH.
    pub relocated: bool,
    /// Directory the build and extractor ran in.
    pub working_dir: PathBuf,
    pub tidy: Option<TidyOutcome>,
}

/// Runs the build for one source tree.
pub struct BuildCoordinator<'a> {
    config: &'a Config,
    toolchain: &'a dyn Toolchain,
    runner: &'a dyn CommandRunner,
    sink: &'a mut dyn DiagnosticSink,
    extractor: Option<PathBuf>,
    states: Vec<BuildState>,
}

impl<'a> BuildCoordinator<'a> {
    pub fn new(
        config: &'a Config,
        toolchain: &'a dyn Toolchain,
        runner: &'a dyn CommandRunner,
        sink: &'a mut dyn DiagnosticSink,
    ) -> Self {
        Self {
            config,
            toolchain,
            runner,
            sink,
            extractor: None,
            states: vec![BuildState::Init],
        }
    }

    /// Use `extractor` instead of looking it up at extraction time.
    pub fn with_extractor(mut self, extractor: impl Into<PathBuf>) -> Self {
        self.extractor = Some(extractor.into());
        self
    }

    fn enter(&mut self, state: BuildState) {
        tracing::debug!("Build state: {:?}", state);
        self.states.push(state);
    }

    /// Prepare, build and extract the project at `source_root`.
    ///
    /// A relocated tree is restored before this returns, whether the run
    /// succeeded or not.
    pub fn run(mut self, source_root: &Path) -> Result<BuildReport> {
        let go_version = self.toolchain.version().clone();
        tracing::info!(
            "Autobuilder version {}, environment has go {}",
            env!("CARGO_PKG_VERSION"),
            go_version
        );

        let mut env = EnvOverlay::new("autobuild");
        // Set again below when the tree is relocated.
        env.set(vars::PATH_TRANSFORMER, "");
        if self.config.go111module.is_none() {
            env.set(vars::GO111MODULE, "auto");
        }

        let profile = ManifestProfile::detect(source_root);
        let declared = read_go_directive(source_root, profile);
        check_toolchain_is_new_enough(declared.as_ref(), &go_version, &mut *self.sink);

        let (strategy, mode) = select(profile, source_root);
        let module_mode = fix_vendor_issues(
            mode,
            profile,
            declared.is_some(),
            source_root,
            self.toolchain,
            &env,
        );
        tracing::info!(
            "Using {} to install dependencies, -mod mode {}",
            strategy,
            module_mode
        );

        let tidy = tidy_go_mod(self.toolchain, profile, module_mode, source_root, &env);

        let import_path = discover_import_path(self.config)?;
        let needs_workspace = needs_workspace(
            profile,
            import_path.as_deref(),
            self.config.need_gopath_override,
        );

        let mut decision = RunDecision {
            profile,
            strategy,
            module_mode,
            needs_workspace,
            should_install_deps: false,
        };

        let workspace = match import_path.as_deref() {
            Some(path) if needs_workspace && self.config.is_hosted() => {
                Some(self.set_up_workspace(source_root, path, &mut env)?)
            }
            _ => None,
        };
        let working_dir = workspace
            .as_ref()
            .map(|w| w.relocated_dir().to_path_buf())
            .unwrap_or_else(|| source_root.to_path_buf());

        let outcome = self.build_and_extract(&working_dir, &mut decision, &mut env);

        let relocated = workspace.is_some();
        if let Some(workspace) = workspace {
            workspace.restore();
        }
        outcome?;

        Ok(BuildReport {
            decision,
            states: self.states,
            import_path,
            relocated,
            working_dir,
            tidy,
        })
    }

    fn set_up_workspace(
        &self,
        source_root: &Path,
        import_path: &str,
        env: &mut EnvOverlay,
    ) -> Result<RelocatedWorkspace> {
        let mut workspace = relocate(source_root, import_path)?;

        let transformer = workspace.write_path_transformer()?;
        env.set(vars::PATH_TRANSFORMER, transformer.to_string_lossy());

        let gopath = workspace.plan().gopath(self.config.gopath.as_deref())?;
        tracing::info!("GOPATH set to {}", gopath);
        env.set(vars::GOPATH, gopath);

        Ok(workspace)
    }

    fn build_and_extract(
        &mut self,
        cwd: &Path,
        decision: &mut RunDecision,
        env: &mut EnvOverlay,
    ) -> Result<()> {
        match self.config.build_command.as_deref() {
            Some(commands) => {
                run_build_script(self.runner, commands, cwd, env)?;
                self.enter(BuildState::CustomBuildRan);
            }
            None => {
                decision.should_install_deps = if !autobuild(self.runner, self.toolchain, cwd, env) {
                    tracing::info!("Build failed, continuing to install dependencies.");
                    true
                } else if self.toolchain.dep_errors(
                    cwd,
                    env,
                    "./...",
                    &decision.module_mode.flags(self.toolchain.version()),
                ) {
                    tracing::info!(
                        "Dependencies are still not resolving after the build, continuing to install dependencies."
                    );
                    true
                } else {
                    false
                };
                self.enter(BuildState::DefaultBuildAttempted);
            }
        }

        if !decision.should_install_deps {
            self.enter(BuildState::DependencyInstallSkipped);
        } else if decision.module_mode == ModuleMode::Vendored {
            tracing::info!("Skipping dependency installation because a Go vendor directory was found.");
            self.enter(BuildState::DependencyInstallSkipped);
        } else {
            install_dependencies(
                self.runner,
                decision.strategy,
                self.toolchain.program(),
                cwd,
                self.config.cache_dir.as_deref(),
                env,
            );
            self.enter(BuildState::DependencyInstallRan);
        }

        if decision.module_mode == ModuleMode::Vendored && !self.toolchain.vendor_consistent(cwd, env) {
            tracing::warn!(
                "The vendor directory is not consistent with the go.mod; not using vendored dependencies."
            );
            decision.module_mode = ModuleMode::AutoUpdate;
        }
        self.enter(BuildState::VendorRechecked);

        let extractor = match &self.extractor {
            Some(path) => path.clone(),
            None => find_extractor()?,
        };
        let args = extractor_args(decision.profile, decision.module_mode, self.toolchain.version());
        run_extractor(self.runner, &extractor, &args, cwd, env)?;
        self.enter(BuildState::Extracted);

        Ok(())
    }
}
