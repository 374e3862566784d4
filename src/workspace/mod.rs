//! Synthetic GOPATH workspaces for projects that predate Go modules.
//!
//! # Modules
//!
//! - [`relocate`] - Reversible move of the checkout into `root/src/<import path>`
//! - [`path_transformer`] - Mapping extracted paths back to the checkout

pub mod path_transformer;
pub mod relocate;

pub use relocate::{relocate, RelocatedWorkspace, RelocationPlan};
