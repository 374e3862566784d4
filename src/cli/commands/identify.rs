//! `--identify-environment` implementation.
//!
//! Works out which Go version the environment should provide and writes it
//! to the environment file. Never fails because Go is missing.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::detection::{read_go_directive, ManifestProfile};
use crate::diagnostics::DiagnosticSink;
use crate::environment::{write_environment_file, VersionRequirement};
use crate::error::Result;
use crate::toolchain::{GoToolchain, GoVersion, Toolchain};

use super::dispatcher::{Command, CommandResult};

/// The identify-environment command implementation.
pub struct IdentifyCommand {
    working_dir: PathBuf,
    environment_json: PathBuf,
}

impl IdentifyCommand {
    pub fn new(config: &Config, working_dir: &Path) -> Self {
        Self {
            working_dir: working_dir.to_path_buf(),
            environment_json: config.environment_json.clone(),
        }
    }

    /// Resolve the requirement for an already-detected `installed` version
    /// and write the environment file.
    pub fn identify(
        &self,
        installed: Option<&GoVersion>,
        sink: &mut dyn DiagnosticSink,
    ) -> VersionRequirement {
        let profile = ManifestProfile::detect(&self.working_dir);
        let declared = read_go_directive(&self.working_dir, profile);

        let requirement = VersionRequirement::resolve(declared.as_ref(), installed);
        requirement.report(sink);

        write_environment_file(&self.environment_json, requirement.version.as_ref());
        requirement
    }
}

/// The installed Go version, or `None` when `go` is missing or unusable.
fn detect_installed() -> Option<GoVersion> {
    match GoToolchain::detect() {
        Ok(Some(go)) => Some(go.version().clone()),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Treating Go as not installed: {}", e);
            None
        }
    }
}

impl Command for IdentifyCommand {
    fn execute(&self, sink: &mut dyn DiagnosticSink) -> Result<CommandResult> {
        let installed = detect_installed();
        self.identify(installed.as_ref(), sink);
        Ok(CommandResult::success())
    }
}
