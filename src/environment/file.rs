//! The environment-requirements file read by the provisioning step.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AutobuildError, Result};
use crate::toolchain::GoVersion;

/// `{ "include": [ { "go": { "version": "1.15" } } ] }`, or an empty
/// `include` list when nothing needs to be provisioned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentFile {
    pub include: Vec<EnvironmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentEntry {
    pub go: GoRequirement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoRequirement {
    pub version: String,
}

impl EnvironmentFile {
    pub fn new(version: Option<&GoVersion>) -> Self {
        Self {
            include: version
                .map(|v| EnvironmentEntry {
                    go: GoRequirement {
                        version: v.to_string(),
                    },
                })
                .into_iter()
                .collect(),
        }
    }

    /// The version that should be provisioned, if any.
    pub fn go_version(&self) -> Option<&str> {
        self.include.first().map(|entry| entry.go.version.as_str())
    }

    /// Write the file to `path`, replacing any existing content.
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string(self).map_err(anyhow::Error::from)?;
        fs::write(path, content)
            .map_err(|e| AutobuildError::filesystem("write environment file", path, e))?;
        tracing::debug!("Wrote environment file {}", path.display());
        Ok(())
    }
}

/// Write the environment file, logging instead of failing.
pub fn write_environment_file(path: &Path, version: Option<&GoVersion>) -> bool {
    match EnvironmentFile::new(version).write(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("{}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn empty_file_when_nothing_is_needed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("environment.json");

        assert!(write_environment_file(&path, None));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({ "include": [] }));
    }

    #[test]
    fn file_names_the_version_to_provision() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("environment.json");
        let version = GoVersion::parse("1.15").unwrap();

        assert!(write_environment_file(&path, Some(&version)));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "include": [ { "go": { "version": "1.15" } } ] })
        );
    }

    #[test]
    fn round_trips_through_serde() {
        let version = GoVersion::parse("1.20").unwrap();
        let file = EnvironmentFile::new(Some(&version));

        let parsed: EnvironmentFile =
            serde_json::from_str(&serde_json::to_string(&file).unwrap()).unwrap();

        assert_eq!(parsed.go_version(), Some("1.20"));
    }

    #[test]
    fn unwritable_path_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("environment.json");

        assert!(!write_environment_file(&path, None));
    }
}
