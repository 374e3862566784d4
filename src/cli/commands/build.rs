//! Build mode: the default when no arguments are given.

use crate::build::BuildCoordinator;
use crate::config::Config;
use crate::diagnostics::DiagnosticSink;
use crate::error::Result;
use crate::shell::SystemRunner;
use crate::toolchain::GoToolchain;

use super::dispatcher::{Command, CommandResult};

/// The build command implementation.
pub struct BuildCommand<'a> {
    config: &'a Config,
}

impl<'a> BuildCommand<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }
}

impl Command for BuildCommand<'_> {
    fn execute(&self, sink: &mut dyn DiagnosticSink) -> Result<CommandResult> {
        let source_root = self.config.resolve_source_dir()?;
        let toolchain = GoToolchain::require()?;
        let runner = SystemRunner;

        let report = BuildCoordinator::new(self.config, &toolchain, &runner, sink).run(&source_root)?;

        tracing::debug!(
            "Finished in state {:?} with {:?}",
            report.states.last(),
            report.decision
        );
        Ok(CommandResult::success())
    }
}
