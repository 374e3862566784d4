//! The path-translation file handed to the extractor.
//!
//! After relocation the extractor sees files under the synthetic GOPATH.
//! The path-translation file maps them back to the original source root so
//! that recorded paths match the checkout:
//!
//! ```text
//! #/real/source/root
//! /real/source/root/root/src/github.com/owner/repo//
//! ```

use std::io::Write;
use std::path::Path;

use tempfile::{Builder, TempPath};

use crate::error::{AutobuildError, Result};

/// Render the file's content.
pub fn render(real_root: &Path, relocated_dir: &Path) -> String {
    format!(
        "#{}\n{}//\n",
        real_root.display(),
        relocated_dir.display()
    )
}

/// Write the path-translation file to a new temporary file.
///
/// The file is deleted when the returned [`TempPath`] is dropped.
pub fn write(real_root: &Path, relocated_dir: &Path) -> Result<TempPath> {
    let mut file = Builder::new()
        .prefix("path-transformer")
        .tempfile()
        .map_err(|e| AutobuildError::filesystem("create path transformer file in", std::env::temp_dir(), e))?;

    file.write_all(render(real_root, relocated_dir).as_bytes())
        .map_err(|e| AutobuildError::filesystem("write path transformer file", file.path(), e))?;

    let path = file.into_temp_path();
    tracing::debug!("Wrote path transformer file {}", path.display());
    Ok(path)
}
