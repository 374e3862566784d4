//! External process execution and environment overlays.

pub mod command;
pub mod env;
pub mod runner;
pub mod script;

pub use command::{display_command, execute, CommandOptions, CommandResult};
pub use env::EnvOverlay;
pub use runner::{CommandRunner, MockRunner, RecordedCommand, SystemRunner};
pub use script::{run_build_script, ScriptKind};
