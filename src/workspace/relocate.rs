//! Moving a legacy GOPATH project into a synthetic workspace and back.
//!
//! Projects without modules must live at `$GOPATH/src/<import path>`. The
//! checkout is moved to `<source root>/root/src/<import path>` (via a scratch
//! directory, since the target lies inside the source root) and
//! `<source root>/root` is prepended to `GOPATH`.
//!
//! [`RelocatedWorkspace`] undoes the move exactly once, either through
//! [`RelocatedWorkspace::restore`] or when it is dropped.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Component, Path, PathBuf};

use tempfile::{Builder, TempPath};

use crate::error::{AutobuildError, Result};

use super::path_transformer;

/// Name of the synthetic GOPATH directory inside the source root.
pub const WORKSPACE_DIR_NAME: &str = "root";

/// Where everything went during relocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RelocationPlan {
    /// The source root as configured.
    pub source_root: PathBuf,
    /// Name of the scratch directory created inside the source root.
    pub scratch_name: OsString,
    /// The source root with symlinks resolved.
    pub real_root: PathBuf,
    /// The synthetic GOPATH entry, `<real_root>/root`.
    pub workspace_root: PathBuf,
    /// Where the checkout now lives, `<workspace_root>/src/<import path>`.
    pub relocated_dir: PathBuf,
    /// Top-level entries that were moved, in the order they were moved.
    pub original_entries: Vec<OsString>,
}

impl RelocationPlan {
    fn scratch_dir(&self) -> PathBuf {
        self.source_root.join(&self.scratch_name)
    }

    /// `GOPATH` for child processes: the workspace root, followed by the
    /// previous `GOPATH` if there was one.
    pub fn gopath(&self, previous: Option<&str>) -> Result<String> {
        let mut entries = vec![self.workspace_root.clone()];
        if let Some(previous) = previous.filter(|p| !p.is_empty()) {
            entries.extend(std::env::split_paths(previous));
        }
        let joined = std::env::join_paths(entries).map_err(anyhow::Error::from)?;
        Ok(joined.to_string_lossy().into_owned())
    }
}

/// A relocated source tree. Restores the original layout when dropped.
#[derive(Debug)]
pub struct RelocatedWorkspace {
    plan: RelocationPlan,
    path_transformer: Option<TempPath>,
    restored: bool,
}

impl RelocatedWorkspace {
    pub fn plan(&self) -> &RelocationPlan {
        &self.plan
    }

    /// Directory the build and extractor run in.
    pub fn relocated_dir(&self) -> &Path {
        &self.plan.relocated_dir
    }

    /// The path-translation file, if one has been written.
    pub fn path_transformer(&self) -> Option<&Path> {
        self.path_transformer.as_deref()
    }

    /// Write the path-translation file. It is deleted along with this guard.
    pub fn write_path_transformer(&mut self) -> Result<&Path> {
        let path = path_transformer::write(&self.plan.real_root, &self.plan.relocated_dir)?;
        let path = self.path_transformer.insert(path);
        Ok(&**path)
    }

    /// Move everything back to the source root.
    pub fn restore(mut self) {
        self.restore_once();
    }

    fn restore_once(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;

        if let Some(path) = self.path_transformer.take() {
            if let Err(e) = path.close() {
                tracing::warn!("Failed to remove path transformer file: {}", e);
            }
        }

        restore_layout(&self.plan);
    }
}

impl Drop for RelocatedWorkspace {
    fn drop(&mut self) {
        self.restore_once();
    }
}

/// `import_path` as a path relative to `$GOPATH/src`.
///
/// Leading separators are dropped. Anything that would still leave the
/// workspace (`..`, a drive prefix) or names no directory is rejected.
fn import_path_dir(import_path: &str) -> Result<PathBuf> {
    let invalid = || AutobuildError::InvalidImportPath {
        path: import_path.to_string(),
    };

    let trimmed = import_path.trim_start_matches(['/', '\\']);
    let mut dir = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => dir.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(invalid())
            }
        }
    }
    if dir.as_os_str().is_empty() {
        return Err(invalid());
    }
    Ok(dir)
}

/// Move the contents of `source_root` to `<source_root>/root/src/<import_path>`.
///
/// Any failure is an error. Entries already moved when a step fails are put
/// back before returning.
pub fn relocate(source_root: &Path, import_path: &str) -> Result<RelocatedWorkspace> {
    let import_dir = import_path_dir(import_path)?;

    let scratch = Builder::new()
        .prefix("scratch")
        .tempdir_in(source_root)
        .map_err(|e| AutobuildError::filesystem("create temporary directory in", source_root, e))?
        .keep();
    tracing::info!("Temporary directory is {}", scratch.display());

    let scratch_name = scratch
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();

    // Until the final rename, "relocated" means "in the scratch directory",
    // so dropping the guard on an early error undoes a partial move.
    let mut workspace = RelocatedWorkspace {
        plan: RelocationPlan {
            source_root: source_root.to_path_buf(),
            scratch_name: scratch_name.clone(),
            real_root: source_root.to_path_buf(),
            workspace_root: source_root.join(WORKSPACE_DIR_NAME),
            relocated_dir: scratch.clone(),
            original_entries: Vec::new(),
        },
        path_transformer: None,
        restored: false,
    };

    for name in list_entries(source_root)? {
        if name == scratch_name {
            continue;
        }
        let from = source_root.join(&name);
        let to = scratch.join(&name);
        tracing::debug!("Moving {} to {}", from.display(), to.display());
        fs::rename(&from, &to)
            .map_err(|e| AutobuildError::filesystem("move to the temporary directory", &from, e))?;
        workspace.plan.original_entries.push(name);
    }

    let real_root = fs::canonicalize(source_root)
        .map_err(|e| AutobuildError::filesystem("evaluate symlinks in", source_root, e))?;
    let workspace_root = real_root.join(WORKSPACE_DIR_NAME);
    let relocated_dir = workspace_root.join("src").join(&import_dir);

    if let Some(parent) = relocated_dir.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| AutobuildError::filesystem("create directory", parent, e))?;
    }
    workspace.plan.real_root = real_root;
    workspace.plan.workspace_root = workspace_root;

    tracing::info!("Moving {} to {}", scratch.display(), relocated_dir.display());
    if let Err(e) = fs::rename(&scratch, &relocated_dir) {
        if let Some(parent) = relocated_dir.parent() {
            prune_empty_dirs(parent, &workspace.plan.workspace_root);
        }
        return Err(AutobuildError::filesystem(
            "rename temporary directory to",
            &relocated_dir,
            e,
        ));
    }
    workspace.plan.relocated_dir = relocated_dir;

    Ok(workspace)
}

fn list_entries(dir: &Path) -> Result<Vec<OsString>> {
    let read_dir = fs::read_dir(dir)
        .map_err(|e| AutobuildError::filesystem("read source directory", dir, e))?;
    let mut names = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| AutobuildError::filesystem("read source directory", dir, e))?;
        names.push(entry.file_name());
    }
    names.sort();
    Ok(names)
}

/// Put every recorded entry back in the source root and remove the
/// directories relocation created. Failures are logged; restoration
/// continues with the next entry.
fn restore_layout(plan: &RelocationPlan) {
    let scratch = plan.scratch_dir();

    let from = if plan.relocated_dir == scratch {
        scratch.clone()
    } else {
        match fs::rename(&plan.relocated_dir, &scratch) {
            Ok(()) => {
                if let Some(parent) = plan.relocated_dir.parent() {
                    prune_empty_dirs(parent, &plan.workspace_root);
                }
                scratch.clone()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to move {} back to {}: {}",
                    plan.relocated_dir.display(),
                    scratch.display(),
                    e
                );
                plan.relocated_dir.clone()
            }
        }
    };

    for name in &plan.original_entries {
        if *name == plan.scratch_name {
            continue;
        }
        let source = from.join(name);
        let target = plan.source_root.join(name);
        tracing::debug!("Restoring {} to {}", source.display(), target.display());
        if let Err(e) = fs::rename(&source, &target) {
            tracing::warn!(
                "Failed to move {} from directory {} to directory {}: {}",
                Path::new(name).display(),
                from.display(),
                plan.source_root.display(),
                e
            );
        }
    }

    if from == scratch {
        if let Err(e) = fs::remove_dir(&scratch) {
            tracing::warn!("Failed to remove {}: {}", scratch.display(), e);
        }
    } else {
        prune_empty_dirs(&from, &plan.workspace_root);
    }
}

/// Remove `dir` and its ancestors up to and including `stop_at`, stopping
/// at the first one that is not empty.
fn prune_empty_dirs(dir: &Path, stop_at: &Path) {
    let mut current = Some(dir);
    while let Some(dir) = current {
        if !dir.starts_with(stop_at) || fs::remove_dir(dir).is_err() {
            break;
        }
        if dir == stop_at {
            break;
        }
        current = dir.parent();
    }
}
