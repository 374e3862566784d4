//! Building the project and handing it to the extractor.
//!
//! - [`autobuild`] - The default build from project build scripts
//! - [`gomod`] - `go mod tidy` before building
//! - [`installer`] - Dependency installation per strategy
//! - [`extract`] - Locating and running the extractor
//! - [`coordinator`] - The build sequence tying these together

pub mod autobuild;
pub mod coordinator;
pub mod extract;
pub mod gomod;
pub mod installer;

pub use autobuild::{autobuild, BuildScript, BUILD_SCRIPTS};
pub use coordinator::{BuildCoordinator, BuildReport, BuildState, RunDecision};
pub use extract::{extractor_args, find_extractor, run_extractor, EXTRACTOR_NAME};
pub use gomod::{tidy_go_mod, TidyOutcome};
pub use installer::{install_command, install_dependencies};
