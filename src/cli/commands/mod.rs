//! CLI command implementations.
//!
//! Each mode implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results. Commands are
//! dispatched via [`CommandDispatcher`].

pub mod build;
pub mod dispatcher;
pub mod identify;

pub use build::BuildCommand;
pub use dispatcher::{Command, CommandDispatcher, CommandResult};
pub use identify::IdentifyCommand;
