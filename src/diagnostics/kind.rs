//! The closed set of diagnostics the autobuilder can report.

use serde::Serialize;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; nothing needs to change.
    Note,
    /// Something the user should look at.
    Warning,
    /// Something that prevented analysis.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Note => write!(f, "note"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Where a diagnostic should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    pub status_page: bool,
    pub cli_summary_table: bool,
    pub telemetry: bool,
}

impl Visibility {
    /// Shown to users everywhere.
    pub const ALL: Visibility = Visibility {
        status_page: true,
        cli_summary_table: true,
        telemetry: true,
    };

    /// Only recorded in telemetry.
    pub const TELEMETRY_ONLY: Visibility = Visibility {
        status_page: false,
        cli_summary_table: false,
        telemetry: true,
    };
}

/// A kind of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The `go.mod` file asks for a newer Go than the one installed.
    NewerGoVersionNeeded,
    /// The `go.mod` version is outside the supported range.
    UnsupportedVersionGoMod,
    /// The installed Go version is outside the supported range.
    UnsupportedVersionEnvironment,
    /// Neither a toolchain nor a `go.mod` directive was found.
    NoGoModAndNoGoEnv,
    /// A `go.mod` directive was found but no toolchain.
    NoGoEnv,
    /// A toolchain was found but no `go.mod` directive.
    NoGoMod,
    /// The `go.mod` version is newer than the installed toolchain.
    VersionGoModHigherVersionEnvironment,
    /// The installed toolchain is at least the `go.mod` version.
    VersionGoModNotHigherVersionEnvironment,
}

impl DiagnosticKind {
    /// Every kind, in declaration order.
    pub const ALL: [DiagnosticKind; 8] = [
        DiagnosticKind::NewerGoVersionNeeded,
        DiagnosticKind::UnsupportedVersionGoMod,
        DiagnosticKind::UnsupportedVersionEnvironment,
        DiagnosticKind::NoGoModAndNoGoEnv,
        DiagnosticKind::NoGoEnv,
        DiagnosticKind::NoGoMod,
        DiagnosticKind::VersionGoModHigherVersionEnvironment,
        DiagnosticKind::VersionGoModNotHigherVersionEnvironment,
    ];

    /// Stable identifier.
    pub fn id(&self) -> &'static str {
        match self {
            DiagnosticKind::NewerGoVersionNeeded => "go/autobuilder/newer-go-version-needed",
            DiagnosticKind::UnsupportedVersionGoMod => {
                "go/autobuilder/env-unsupported-version-in-go-mod"
            }
            DiagnosticKind::UnsupportedVersionEnvironment => {
                "go/autobuilder/env-unsupported-version-in-environment"
            }
            DiagnosticKind::NoGoModAndNoGoEnv => "go/autobuilder/env-no-go-mod-and-no-go-env",
            DiagnosticKind::NoGoEnv => "go/autobuilder/env-no-go-env",
            DiagnosticKind::NoGoMod => "go/autobuilder/env-no-go-mod",
            DiagnosticKind::VersionGoModHigherVersionEnvironment => {
                "go/autobuilder/env-version-go-mod-higher-than-go-env"
            }
            DiagnosticKind::VersionGoModNotHigherVersionEnvironment => {
                "go/autobuilder/env-version-go-mod-lower-than-or-equal-to-go-env"
            }
        }
    }

    /// Human-readable title.
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticKind::NewerGoVersionNeeded => "Newer Go version needed",
            DiagnosticKind::UnsupportedVersionGoMod => "Unsupported Go version in `go.mod` file",
            DiagnosticKind::UnsupportedVersionEnvironment => {
                "Unsupported Go version in environment"
            }
            DiagnosticKind::NoGoModAndNoGoEnv => "No `go.mod` file found and no Go version in environment",
            DiagnosticKind::NoGoEnv => "No Go version in environment",
            DiagnosticKind::NoGoMod => "No `go.mod` file found",
            DiagnosticKind::VersionGoModHigherVersionEnvironment => {
                "The Go version in `go.mod` file is higher than the Go version in environment"
            }
            DiagnosticKind::VersionGoModNotHigherVersionEnvironment => {
                "The Go version in `go.mod` file is lower than or equal to the Go version in environment"
            }
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::NewerGoVersionNeeded => Severity::Warning,
            _ => Severity::Note,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            DiagnosticKind::NewerGoVersionNeeded => Visibility::ALL,
            _ => Visibility::TELEMETRY_ONLY,
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}
