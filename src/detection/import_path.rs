//! Working out the Go import path of the repository being built.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use url::{ParseError, Url};

use crate::config::{vars, Config};
use crate::error::{AutobuildError, Result};

/// `[user@]host:path[.git]`, as used by `git@github.com:owner/repo.git`.
static SCP_LIKE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^@]+@)?([^:]+):([^/].*?)(\.git)?$").unwrap());

static PATH_DECORATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/+|\.git$").unwrap());

/// Determine the import path from the configuration.
///
/// In order: the explicit `LGTM_INDEX_IMPORT_PATH`, the repository URL,
/// then `github.com/<GITHUB_REPOSITORY>`. A repository URL that cannot be
/// parsed at all is an error.
pub fn discover_import_path(config: &Config) -> Result<Option<String>> {
    let import_path = if let Some(path) = &config.import_path {
        path.clone()
    } else if let Some(repo_url) = &config.repo_url {
        match import_path_from_repo_url(repo_url)? {
            Some(path) => path,
            None => {
                tracing::info!(
                    "Failed to determine import path from {} '{}'",
                    vars::REPO_URL,
                    repo_url
                );
                return Ok(None);
            }
        }
    } else if let Some(repository) = &config.github_repository {
        format!("github.com/{}", repository)
    } else {
        tracing::info!(
            "Unable to determine import path, as neither {} nor {} is set",
            vars::IMPORT_PATH,
            vars::GITHUB_REPOSITORY
        );
        return Ok(None);
    };

    tracing::info!("Import path is '{}'", import_path);
    Ok(Some(import_path))
}

/// Derive an import path such as `github.com/owner/repo` from a clone URL.
///
/// Returns `Ok(None)` for URLs that carry no usable host and path, such as
/// `file://` URLs or bare paths.
pub fn import_path_from_repo_url(repo_url: &str) -> Result<Option<String>> {
    if let Some(captures) = SCP_LIKE_URL.captures(repo_url) {
        return Ok(Some(format!("{}/{}", &captures[2], &captures[3])));
    }

    let url = match Url::parse(repo_url) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) | Err(ParseError::EmptyHost) => return Ok(None),
        Err(e) => {
            tracing::debug!("Failed to parse {}: {}", repo_url, e);
            return Err(AutobuildError::MalformedRepoUrl {
                url: repo_url.to_string(),
            });
        }
    };

    if url.scheme() == "file" {
        return Ok(None);
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host,
        _ => return Ok(None),
    };
    let decoded = percent_decode_str(url.path()).decode_utf8_lossy();
    let path = PATH_DECORATION.replace_all(&decoded, "");
    if path.is_empty() {
        return Ok(None);
    }

    Ok(Some(format!("{}/{}", host, path)))
}
