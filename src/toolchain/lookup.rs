//! Executable lookup on PATH.
//!
//! Lookups iterate over PATH entries directly instead of shelling out to
//! `which`, whose behavior varies across systems.

use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// The file name of an executable on this platform (`go` or `go.exe`).
pub fn executable_name(tool: &str) -> String {
    format!("{}{}", tool, std::env::consts::EXE_SUFFIX)
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let name = executable_name(tool);
    for dir in path_entries {
        let candidate = dir.join(&name);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Resolve a tool on the system PATH.
pub fn find_executable(tool: &str) -> Option<PathBuf> {
    resolve_tool_path(tool, &parse_system_path())
}
