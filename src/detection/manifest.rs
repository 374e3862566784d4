//! Manifest inspection: which dependency manager a project uses, and which
//! Go version its `go.mod` declares.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::toolchain::GoVersion;

static GO_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^go[ \t\r]+([0-9]+\.[0-9]+)$").unwrap());

/// The kind of project, decided by which manifest file is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestProfile {
    /// `go.mod` present.
    ModuleBased,
    /// `Gopkg.toml` present (dep).
    DepBased,
    /// `glide.yaml` present.
    GlideBased,
    /// No manifest; dependencies are fetched with `go get`.
    LegacyGoGet,
}

impl ManifestProfile {
    /// Detect the profile of the project at `root`.
    ///
    /// The first manifest found wins, in the order `go.mod`, `Gopkg.toml`,
    /// `glide.yaml`.
    pub fn detect(root: &Path) -> Self {
        if file_exists(root, "go.mod") {
            tracing::info!("Found go.mod, enabling go modules");
            return ManifestProfile::ModuleBased;
        }
        if file_exists(root, "Gopkg.toml") {
            tracing::info!("Found Gopkg.toml, using dep instead of go get");
            return ManifestProfile::DepBased;
        }
        if file_exists(root, "glide.yaml") {
            tracing::info!("Found glide.yaml, using glide instead of go get");
            return ManifestProfile::GlideBased;
        }
        ManifestProfile::LegacyGoGet
    }

    pub fn is_module_based(&self) -> bool {
        matches!(self, ManifestProfile::ModuleBased)
    }
}

impl std::fmt::Display for ManifestProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManifestProfile::ModuleBased => write!(f, "go modules"),
            ManifestProfile::DepBased => write!(f, "dep"),
            ManifestProfile::GlideBased => write!(f, "glide"),
            ManifestProfile::LegacyGoGet => write!(f, "go get"),
        }
    }
}

/// Check if a regular file exists relative to `root`.
pub fn file_exists(root: &Path, relative: &str) -> bool {
    root.join(relative).is_file()
}

/// Check if a directory exists relative to `root`.
pub fn dir_exists(root: &Path, relative: &str) -> bool {
    root.join(relative).is_dir()
}

/// Read the `go <major>.<minor>` directive from `go.mod`.
///
/// Only module-based projects have one. An unreadable `go.mod` is logged and
/// treated as having no directive.
pub fn read_go_directive(root: &Path, profile: ManifestProfile) -> Option<GoVersion> {
    if !profile.is_module_based() {
        return None;
    }

    let content = match fs::read_to_string(root.join("go.mod")) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!("Failed to read go.mod to check for missing Go version: {}", e);
            return None;
        }
    };

    parse_go_directive(&content)
}

/// Find the first `go` directive in the text of a `go.mod` file.
pub fn parse_go_directive(content: &str) -> Option<GoVersion> {
    let captures = GO_DIRECTIVE.captures(content)?;
    GoVersion::parse(&captures[1]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        temp
    }

    #[test]
    fn go_mod_wins_over_other_manifests() {
        let temp = project(&[("go.mod", "module x\n"), ("Gopkg.toml", ""), ("glide.yaml", "")]);
        assert_eq!(
            ManifestProfile::detect(temp.path()),
            ManifestProfile::ModuleBased
        );
    }

    #[test]
    fn gopkg_wins_over_glide() {
        let temp = project(&[("Gopkg.toml", ""), ("glide.yaml", "")]);
        assert_eq!(ManifestProfile::detect(temp.path()), ManifestProfile::DepBased);
    }

    #[test]
    fn glide_alone() {
        let temp = project(&[("glide.yaml", "")]);
        assert_eq!(
            ManifestProfile::detect(temp.path()),
            ManifestProfile::GlideBased
        );
    }

    #[test]
    fn no_manifest_is_legacy() {
        let temp = project(&[("main.go", "package main\n")]);
        assert_eq!(
            ManifestProfile::detect(temp.path()),
            ManifestProfile::LegacyGoGet
        );
    }

    #[test]
    fn directory_named_go_mod_does_not_count() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("go.mod")).unwrap();

        assert_eq!(
            ManifestProfile::detect(temp.path()),
            ManifestProfile::LegacyGoGet
        );
    }

    #[test]
    fn reads_go_directive() {
        let temp = project(&[("go.mod", "module example.com/x\n\ngo 1.15\n\nrequire foo v1.0.0\n")]);

        let version = read_go_directive(temp.path(), ManifestProfile::ModuleBased).unwrap();

        assert_eq!(version.to_string(), "1.15");
    }

    #[test]
    fn crlf_before_directive_line_is_tolerated() {
        assert_eq!(
            parse_go_directive("module x\r\ngo\t1.18\nrequire y v1\n").map(|v| v.to_string()),
            Some("1.18".to_string())
        );
    }

    #[test]
    fn carriage_return_between_go_and_version_is_whitespace() {
        assert_eq!(
            parse_go_directive("module x\ngo\r1.18\n").map(|v| v.to_string()),
            Some("1.18".to_string())
        );
    }

    #[test]
    fn crlf_on_directive_line_is_not_matched() {
        assert_eq!(parse_go_directive("module x\r\ngo 1.18\r\nrequire y v1\r\n"), None);
    }

    #[test]
    fn go_directive_with_patch_is_ignored() {
        assert_eq!(parse_go_directive("module x\ngo 1.21.0\n"), None);
    }

    #[test]
    fn indented_directive_is_ignored() {
        assert_eq!(parse_go_directive("module x\n  go 1.16\n"), None);
    }

    #[test]
    fn missing_directive() {
        let temp = project(&[("go.mod", "module example.com/x\n")]);
        assert_eq!(read_go_directive(temp.path(), ManifestProfile::ModuleBased), None);
    }

    #[test]
    fn non_module_projects_have_no_directive() {
        let temp = project(&[("go.mod", "module x\ngo 1.15\n")]);
        assert_eq!(read_go_directive(temp.path(), ManifestProfile::DepBased), None);
    }

    #[test]
    fn unreadable_go_mod_yields_none() {
        let temp = TempDir::new().unwrap();
        assert_eq!(read_go_directive(temp.path(), ManifestProfile::ModuleBased), None);
    }
}
