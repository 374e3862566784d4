//! Loading [`Config`] from environment variables.

use std::path::PathBuf;

use crate::error::{AutobuildError, Result};

/// Names of the environment variables the autobuilder reads.
pub mod vars {
    /// Directory containing the source code to build.
    pub const SOURCE_DIR: &str = "LGTM_SRC";
    /// Overrides the import path of the project.
    pub const IMPORT_PATH: &str = "LGTM_INDEX_IMPORT_PATH";
    /// Repository URL used to derive the import path.
    pub const REPO_URL: &str = "SEMMLE_REPO_URL";
    /// `owner/repo` slug used to derive a `github.com` import path.
    pub const GITHUB_REPOSITORY: &str = "GITHUB_REPOSITORY";
    /// Newline-separated dependency installation commands.
    pub const BUILD_COMMAND: &str = "CODEQL_EXTRACTOR_GO_BUILD_COMMAND";
    /// Legacy alias of [`BUILD_COMMAND`].
    pub const LEGACY_BUILD_COMMAND: &str = "LGTM_INDEX_BUILD_COMMAND";
    /// Forces the GOPATH set-up on (`true`) or off (`false`).
    pub const NEED_GOPATH: &str = "LGTM_INDEX_NEED_GOPATH";
    /// Go's module-mode toggle.
    pub const GO111MODULE: &str = "GO111MODULE";
    /// Existing GOPATH, extended when a temporary workspace is set up.
    pub const GOPATH: &str = "GOPATH";
    /// Root directory for installer-specific caches.
    pub const CACHE_DIR: &str = "SEMMLE_CACHE";
    /// Where `--identify-environment` writes its result.
    pub const ENVIRONMENT_JSON: &str = "CODEQL_EXTRACTOR_ENVIRONMENT_JSON";
    /// Directory receiving diagnostic files.
    pub const DIAGNOSTIC_DIR: &str = "CODEQL_EXTRACTOR_GO_DIAGNOSTIC_DIR";
    /// Path-translation file handed to the extractor.
    pub const PATH_TRANSFORMER: &str = "SEMMLE_PATH_TRANSFORMER";
}

/// Default location of the environment file.
pub const DEFAULT_ENVIRONMENT_JSON: &str = "environment.json";

/// Configuration for a single autobuilder run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Explicit source directory (`LGTM_SRC`).
    pub source_dir: Option<PathBuf>,

    /// Explicit import path (`LGTM_INDEX_IMPORT_PATH`).
    pub import_path: Option<String>,

    /// Repository URL (`SEMMLE_REPO_URL`).
    pub repo_url: Option<String>,

    /// Repository slug (`GITHUB_REPOSITORY`).
    pub github_repository: Option<String>,

    /// Custom dependency installation commands.
    pub build_command: Option<String>,

    /// `Some(true)`/`Some(false)` when GOPATH set-up is forced on or off.
    pub need_gopath_override: Option<bool>,

    /// Value of `GO111MODULE`, if present at all (even empty).
    pub go111module: Option<String>,

    /// Existing `GOPATH`.
    pub gopath: Option<String>,

    /// Cache root (`SEMMLE_CACHE`).
    pub cache_dir: Option<PathBuf>,

    /// Environment file location.
    pub environment_json: PathBuf,

    /// Diagnostics directory.
    pub diagnostic_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_fn(|key| std::env::var(key))
    }

    /// Load configuration with a custom env var lookup function.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn from_env_fn<F>(env_fn: F) -> Result<Self>
    where
        F: Fn(&str) -> std::result::Result<String, std::env::VarError>,
    {
        let non_empty = |key: &str| env_fn(key).ok().filter(|v| !v.is_empty());

        let build_command =
            non_empty(vars::BUILD_COMMAND).or_else(|| non_empty(vars::LEGACY_BUILD_COMMAND));

        let need_gopath_override = match non_empty(vars::NEED_GOPATH).as_deref() {
            None => None,
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                return Err(AutobuildError::InvalidEnvironment {
                    name: vars::NEED_GOPATH.to_string(),
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            source_dir: non_empty(vars::SOURCE_DIR).map(PathBuf::from),
            import_path: non_empty(vars::IMPORT_PATH),
            repo_url: non_empty(vars::REPO_URL),
            github_repository: non_empty(vars::GITHUB_REPOSITORY),
            build_command,
            need_gopath_override,
            go111module: env_fn(vars::GO111MODULE).ok(),
            gopath: non_empty(vars::GOPATH),
            cache_dir: non_empty(vars::CACHE_DIR).map(PathBuf::from),
            environment_json: env_fn(vars::ENVIRONMENT_JSON)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_ENVIRONMENT_JSON)),
            diagnostic_dir: non_empty(vars::DIAGNOSTIC_DIR).map(PathBuf::from),
        })
    }

    /// Whether the run was set up by a hosting service that expects the
    /// autobuilder to manage the source layout.
    pub fn is_hosted(&self) -> bool {
        self.source_dir.is_some() || self.need_gopath_override.is_some()
    }

    /// The directory containing the source code to be analyzed.
    ///
    /// Defaults to the current working directory.
    pub fn resolve_source_dir(&self) -> Result<PathBuf> {
        match &self.source_dir {
            Some(dir) => {
                tracing::info!("{} is {}", vars::SOURCE_DIR, dir.display());
                Ok(dir.clone())
            }
            None => {
                let cwd = std::env::current_dir().map_err(|e| {
                    AutobuildError::filesystem("get current working directory", ".", e)
                })?;
                tracing::info!(
                    "{} is not set; defaulting to current working directory {}",
                    vars::SOURCE_DIR,
                    cwd.display()
                );
                Ok(cwd)
            }
        }
    }
}
