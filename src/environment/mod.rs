//! Go environment requirements.
//!
//! Decides whether the build environment needs a different Go toolchain
//! than the one installed, and records the answer for the provisioning step.
//!
//! # Modules
//!
//! - [`resolver`] - Declared vs. installed version rules
//! - [`file`] - The environment-requirements file

pub mod file;
pub mod resolver;

pub use file::{write_environment_file, EnvironmentFile};
pub use resolver::{
    check_toolchain_is_new_enough, declared_exceeds_installed, max_supported_version,
    min_supported_version, outside_supported_range, VersionRequirement,
};
