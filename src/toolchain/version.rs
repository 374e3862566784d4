//! Go version parsing and ordering.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{AutobuildError, Result};

/// A Go toolchain version such as `1.14`, `1.20.3` or `1.21rc2`.
///
/// Versions order like semver: a missing patch component equals `.0`, and a
/// pre-release sorts before the corresponding release. The original text
/// form is preserved for display, so `1.15` stays `1.15`.
#[derive(Debug, Clone)]
pub struct GoVersion {
    major: u32,
    minor: u32,
    patch: Option<u32>,
    pre: Option<String>,
}

static VERSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(?:go)?(\d+)\.(\d+)(?:\.(\d+))?([A-Za-z][0-9A-Za-z.\-]*)?$").unwrap()
});

impl GoVersion {
    /// Create a release version with an explicit patch component.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
            pre: None,
        }
    }

    /// Create a `major.minor` version without a patch component.
    pub fn major_minor_only(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor,
            patch: None,
            pre: None,
        }
    }

    /// Parse `go1.14.2`, `1.14.2`, `v1.14` or `1.21rc2`.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || AutobuildError::InvalidVersion {
            text: text.to_string(),
        };
        let caps = VERSION_REGEX.captures(text.trim()).ok_or_else(invalid)?;

        let number = |i: usize| -> Result<Option<u32>> {
            caps.get(i)
                .map(|m| m.as_str().parse::<u32>().map_err(|_| invalid()))
                .transpose()
        };

        Ok(Self {
            major: number(1)?.ok_or_else(invalid)?,
            minor: number(2)?.ok_or_else(invalid)?,
            patch: number(3)?,
            pre: caps.get(4).map(|m| m.as_str().to_string()),
        })
    }

    /// Major version component.
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor version component.
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// Patch component, if the version text had one.
    pub fn patch(&self) -> Option<u32> {
        self.patch
    }

    /// This version truncated to `major.minor`.
    ///
    /// Used for range checks, where `1.20.1` and `1.20` are the same version.
    pub fn major_minor(&self) -> Self {
        Self::major_minor_only(self.major, self.minor)
    }

    fn release_key(&self) -> (u32, u32, u32) {
        (self.major, self.minor, self.patch.unwrap_or(0))
    }
}

impl PartialEq for GoVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GoVersion {}

impl PartialOrd for GoVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GoVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.release_key()
            .cmp(&other.release_key())
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl fmt::Display for GoVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if let Some(patch) = self.patch {
            write!(f, ".{}", patch)?;
        }
        if let Some(pre) = &self.pre {
            write!(f, "{}", pre)?;
        }
        Ok(())
    }
}

impl FromStr for GoVersion {
    type Err = AutobuildError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Extract the version from `go version` output.
///
/// `go version` may print warnings on separate lines before the banner, so
/// only the last non-empty line is considered, and within it only the third
/// field (`go version go1.14.2 linux/amd64`).
pub fn parse_go_version_output(output: &str) -> Result<GoVersion> {
    let last_line = output
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default();

    let token = last_line
        .split_whitespace()
        .nth(2)
        .filter(|field| field.starts_with("go"))
        .ok_or_else(|| AutobuildError::InvalidVersion {
            text: last_line.to_string(),
        })?;

    GoVersion::parse(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> GoVersion {
        GoVersion::parse(text).unwrap()
    }

    #[test]
    fn parses_go_prefixed_versions() {
        let version = v("go1.14.2");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 14);
        assert_eq!(version.patch(), Some(2));
        assert_eq!(version.to_string(), "1.14.2");
    }

    #[test]
    fn parses_semver_prefixed_and_bare_versions() {
        assert_eq!(v("v1.16").to_string(), "1.16");
        assert_eq!(v("1.15").to_string(), "1.15");
        assert_eq!(v("1.15").patch(), None);
    }

    #[test]
    fn parses_prereleases() {
        let version = v("go1.21rc2");
        assert_eq!(version.to_string(), "1.21rc2");
        assert!(version < v("1.21"));
        assert!(version > v("1.20.9"));
    }

    #[test]
    fn rejects_non_versions() {
        assert!(GoVersion::parse("").is_err());
        assert!(GoVersion::parse("devel").is_err());
        assert!(GoVersion::parse("1").is_err());
        assert!(GoVersion::parse("1.x").is_err());
    }

    #[test]
    fn missing_patch_equals_zero_patch() {
        assert_eq!(v("1.20"), v("1.20.0"));
        assert!(v("1.20.1") > v("1.20"));
    }

    #[test]
    fn orders_numerically_not_lexically() {
        assert!(v("1.9") < v("1.10"));
        assert!(v("1.14.10") > v("1.14.9"));
        assert!(v("2.0") > v("1.99.99"));
    }

    #[test]
    fn major_minor_drops_patch_and_prerelease() {
        assert_eq!(v("1.20.1").major_minor(), v("1.20.0").major_minor());
        assert_eq!(v("1.21rc1").major_minor().to_string(), "1.21");
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: GoVersion = "go1.18.3".parse().unwrap();
        assert_eq!(parsed, GoVersion::new(1, 18, 3));
    }

    #[test]
    fn parses_plain_banner() {
        let version = parse_go_version_output("go version go1.14.2 linux/amd64\n").unwrap();
        assert_eq!(version, GoVersion::new(1, 14, 2));
    }

    #[test]
    fn ignores_warnings_before_banner() {
        let output = "go: warning: GOPATH set to GOROOT (/usr/local/go) has no effect\n\
                      go version go1.20.4 darwin/arm64\n\n";
        let version = parse_go_version_output(output).unwrap();
        assert_eq!(version.to_string(), "1.20.4");
    }

    #[test]
    fn banner_without_version_field_is_an_error() {
        assert!(parse_go_version_output("").is_err());
        assert!(parse_go_version_output("go version").is_err());
        assert!(parse_go_version_output("something unexpected happened").is_err());
    }
}
