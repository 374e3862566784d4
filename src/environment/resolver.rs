//! Version-compatibility resolution.
//!
//! Compares the Go version a project declares in `go.mod` with the version
//! installed in the environment and decides which version, if any, should
//! be provisioned before building.
//!
//! Rules, first match wins:
//! 1. A declared or installed version outside the supported range: nothing
//! 2. Neither found: the newest supported version
//! 3. Only the declared version: the declared version
//! 4. Only the installed version: nothing
//! 5. Both: the declared version if it is newer than the installed one

use crate::diagnostics::{DiagnosticKind, DiagnosticSink};
use crate::toolchain::GoVersion;

/// Oldest supported Go release (`major.minor`).
pub const MIN_SUPPORTED_GO: (u32, u32) = (1, 11);

/// Newest supported Go release (`major.minor`).
pub const MAX_SUPPORTED_GO: (u32, u32) = (1, 20);

pub fn min_supported_version() -> GoVersion {
    GoVersion::major_minor_only(MIN_SUPPORTED_GO.0, MIN_SUPPORTED_GO.1)
}

pub fn max_supported_version() -> GoVersion {
    GoVersion::major_minor_only(MAX_SUPPORTED_GO.0, MAX_SUPPORTED_GO.1)
}

/// Whether `version` falls outside the supported range.
///
/// Only `major.minor` is compared, so `1.20.1` counts as `1.20`.
pub fn outside_supported_range(version: &GoVersion) -> bool {
    let short = version.major_minor();
    short < min_supported_version() || short > max_supported_version()
}

/// The outcome of comparing declared and installed versions.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRequirement {
    /// The version to provision, or `None` to leave the environment alone.
    pub version: Option<GoVersion>,
    /// Explanation of the decision.
    pub message: String,
    /// The diagnostic describing which rule applied.
    pub kind: DiagnosticKind,
}

impl VersionRequirement {
    /// Decide which Go version to provision.
    ///
    /// # Example
    ///
    /// ```
    /// use go_autobuilder::environment::VersionRequirement;
    /// use go_autobuilder::toolchain::GoVersion;
    ///
    /// let declared = GoVersion::parse("1.15").unwrap();
    /// let installed = GoVersion::parse("go1.14.2").unwrap();
    ///
    /// let requirement = VersionRequirement::resolve(Some(&declared), Some(&installed));
    /// assert_eq!(requirement.version.unwrap().to_string(), "1.15");
    /// ```
    pub fn resolve(declared: Option<&GoVersion>, installed: Option<&GoVersion>) -> Self {
        let min = min_supported_version();
        let max = max_supported_version();

        if let Some(declared) = declared.filter(|v| outside_supported_range(v)) {
            return Self::none(
                format!(
                    "The version of Go found in the `go.mod` file ({}) is outside of the supported range ({}-{}). \
                     Writing an environment file not specifying any version of Go.",
                    declared, min, max
                ),
                DiagnosticKind::UnsupportedVersionGoMod,
            );
        }
        if let Some(installed) = installed.filter(|v| outside_supported_range(v)) {
            return Self::none(
                format!(
                    "The version of Go installed in the environment ({}) is outside of the supported range ({}-{}). \
                     Writing an environment file not specifying any version of Go.",
                    installed, min, max
                ),
                DiagnosticKind::UnsupportedVersionEnvironment,
            );
        }

        match (declared, installed) {
            (None, None) => Self {
                message: format!(
                    "No version of Go installed and no `go.mod` file found. \
                     Writing an environment file specifying the maximum supported version of Go ({}).",
                    max
                ),
                version: Some(max),
                kind: DiagnosticKind::NoGoModAndNoGoEnv,
            },
            (Some(declared), None) => Self {
                message: format!(
                    "No version of Go installed. \
                     Writing an environment file specifying the version of Go found in the `go.mod` file ({}).",
                    declared
                ),
                version: Some(declared.clone()),
                kind: DiagnosticKind::NoGoEnv,
            },
            (None, Some(installed)) => Self::none(
                format!(
                    "No `go.mod` file found. Version {} installed in the environment. \
                     Writing an environment file not specifying any version of Go.",
                    installed
                ),
                DiagnosticKind::NoGoMod,
            ),
            (Some(declared), Some(installed)) if declared > installed => Self {
                message: format!(
                    "The version of Go installed in the environment ({}) is lower than the version found in the `go.mod` file ({}). \
                     Writing an environment file specifying the version of Go from the `go.mod` file ({}).",
                    installed, declared, declared
                ),
                version: Some(declared.clone()),
                kind: DiagnosticKind::VersionGoModHigherVersionEnvironment,
            },
            (Some(declared), Some(installed)) => Self::none(
                format!(
                    "The version of Go installed in the environment ({}) is high enough for the version found in the `go.mod` file ({}). \
                     Writing an environment file not specifying any version of Go.",
                    installed, declared
                ),
                DiagnosticKind::VersionGoModNotHigherVersionEnvironment,
            ),
        }
    }

    fn none(message: String, kind: DiagnosticKind) -> Self {
        Self {
            version: None,
            message,
            kind,
        }
    }

    /// Log the decision and send it to `sink`.
    pub fn report(&self, sink: &mut dyn DiagnosticSink) {
        tracing::info!("{}", self.message);
        sink.emit(self.kind, &self.message);
    }
}

/// Whether `go.mod` asks for a newer Go than the one installed.
pub fn declared_exceeds_installed(declared: Option<&GoVersion>, installed: &GoVersion) -> bool {
    declared.is_some_and(|declared| declared > installed)
}

/// Emit the build-time advisory when the installed toolchain is older than
/// the declared version. Returns whether it was emitted.
pub fn check_toolchain_is_new_enough(
    declared: Option<&GoVersion>,
    installed: &GoVersion,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    if !declared_exceeds_installed(declared, installed) {
        return false;
    }
    let message = format!(
        "The detected version of Go ({}) is lower than the version specified in `go.mod` ({}). \
         [Install a newer version](https://github.com/actions/setup-go#basic).",
        installed,
        declared.map(|v| v.to_string()).unwrap_or_default()
    );
    tracing::warn!("{}", message);
    sink.emit(DiagnosticKind::NewerGoVersionNeeded, &message);
    true
}
