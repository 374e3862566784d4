//! Project inspection: manifests, install strategy and import path.
//!
//! # Modules
//!
//! - [`manifest`] - Which dependency manager a project uses
//! - [`strategy`] - Install strategy, `-mod` mode and GOPATH need
//! - [`import_path`] - The project's Go import path

pub mod import_path;
pub mod manifest;
pub mod strategy;

pub use import_path::{discover_import_path, import_path_from_repo_url};
pub use manifest::{read_go_directive, ManifestProfile};
pub use strategy::{fix_vendor_issues, needs_workspace, select, InstallStrategy, ModuleMode};
