//! Choosing how dependencies are installed and which `-mod` mode the build
//! and extractor use.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::shell::EnvOverlay;
use crate::toolchain::{GoVersion, Toolchain};

use super::manifest::{dir_exists, file_exists, ManifestProfile};

static EXPLICIT_ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^## explicit\r?$").unwrap());

/// Go version written into `go.mod` when vendored dependencies predate
/// `## explicit` annotations. The last release that accepts such vendor
/// directories.
pub const VENDOR_FIX_GO_VERSION: &str = "1.13";

/// The `-mod` mode passed to `go` commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleMode {
    /// No `-mod` flag.
    Unset,
    /// `-mod=readonly`.
    ReadOnly,
    /// `-mod=mod`.
    AutoUpdate,
    /// `-mod=vendor`.
    Vendored,
}

impl ModuleMode {
    /// Command-line flags for this mode with the given toolchain.
    ///
    /// `-mod=mod` is the default before Go 1.14 and rejected there, so it is
    /// omitted for older toolchains.
    pub fn flags(&self, go: &GoVersion) -> Vec<String> {
        match self {
            ModuleMode::Unset => vec![],
            ModuleMode::ReadOnly => vec!["-mod=readonly".to_string()],
            ModuleMode::AutoUpdate => {
                if go.major_minor() < GoVersion::major_minor_only(1, 14) {
                    vec![]
                } else {
                    vec!["-mod=mod".to_string()]
                }
            }
            ModuleMode::Vendored => vec!["-mod=vendor".to_string()],
        }
    }
}

impl std::fmt::Display for ModuleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleMode::Unset => write!(f, "unset"),
            ModuleMode::ReadOnly => write!(f, "readonly"),
            ModuleMode::AutoUpdate => write!(f, "mod"),
            ModuleMode::Vendored => write!(f, "vendor"),
        }
    }
}

/// How dependencies are installed when the default build is not enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallStrategy {
    /// `go get -v ./...` with modules enabled.
    ModuleSync,
    /// `dep ensure -v`, with `-vendor-only` when a `Gopkg.lock` exists.
    DepEnsure { vendor_only: bool },
    /// `glide install`.
    GlideInstall,
    /// `go get -v ./...` with modules disabled.
    GoGet,
}

impl std::fmt::Display for InstallStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstallStrategy::ModuleSync => write!(f, "go get (modules)"),
            InstallStrategy::DepEnsure { vendor_only: true } => write!(f, "dep ensure -vendor-only"),
            InstallStrategy::DepEnsure { vendor_only: false } => write!(f, "dep ensure"),
            InstallStrategy::GlideInstall => write!(f, "glide install"),
            InstallStrategy::GoGet => write!(f, "go get"),
        }
    }
}

/// Pick the install strategy and initial module mode for a project.
pub fn select(profile: ManifestProfile, root: &Path) -> (InstallStrategy, ModuleMode) {
    match profile {
        ManifestProfile::ModuleBased => {
            let mode = if file_exists(root, "vendor/modules.txt") {
                ModuleMode::Vendored
            } else if dir_exists(root, "vendor") {
                ModuleMode::AutoUpdate
            } else {
                ModuleMode::Unset
            };
            (InstallStrategy::ModuleSync, mode)
        }
        ManifestProfile::DepBased => (
            InstallStrategy::DepEnsure {
                vendor_only: file_exists(root, "Gopkg.lock"),
            },
            ModuleMode::Unset,
        ),
        ManifestProfile::GlideBased => (InstallStrategy::GlideInstall, ModuleMode::Unset),
        ManifestProfile::LegacyGoGet => (InstallStrategy::GoGet, ModuleMode::Unset),
    }
}

/// Work around vendor directories created before Go 1.14.
///
/// Go 1.14+ refuses a vendor directory without `## explicit` annotations
/// unless `go.mod` declares an older version. When `go.mod` has no `go`
/// directive, add `go 1.13`; if that fails, stop using the vendor directory.
pub fn fix_vendor_issues(
    mode: ModuleMode,
    profile: ManifestProfile,
    has_go_directive: bool,
    root: &Path,
    toolchain: &dyn Toolchain,
    env: &EnvOverlay,
) -> ModuleMode {
    if mode != ModuleMode::Vendored || !profile.is_module_based() || has_go_directive {
        return mode;
    }

    let modules_txt = match fs::read_to_string(root.join("vendor/modules.txt")) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(
                "Failed to read vendor/modules.txt to check for mismatched Go version: {}",
                e
            );
            return mode;
        }
    };
    if EXPLICIT_ANNOTATION.is_match(&modules_txt) {
        return mode;
    }

    tracing::info!(
        "Adding a version directive to the go.mod file as the modules.txt does not have explicit annotations"
    );
    if toolchain.set_go_directive(root, env, VENDOR_FIX_GO_VERSION) {
        mode
    } else {
        tracing::warn!(
            "Failed to add a version to the go.mod file to fix explicitly required package bug; not using vendored dependencies"
        );
        ModuleMode::AutoUpdate
    }
}

/// Whether the source tree must be moved into a synthetic GOPATH.
///
/// Module-based projects do not need one; everything else does. The
/// `LGTM_INDEX_NEED_GOPATH` override wins either way. Without an import path
/// there is nowhere to put the tree, so the set-up is skipped.
pub fn needs_workspace(
    profile: ManifestProfile,
    import_path: Option<&str>,
    override_value: Option<bool>,
) -> bool {
    let needed = override_value.unwrap_or(!profile.is_module_based());
    if needed && import_path.is_none() {
        tracing::info!("Failed to determine import path, not setting up GOPATH");
        return false;
    }
    needed
}
