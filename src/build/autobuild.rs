//! The default build: run whatever build script the project ships.

use std::ffi::OsString;
use std::path::Path;

use crate::shell::{CommandOptions, CommandRunner, EnvOverlay};
use crate::toolchain::Toolchain;

/// A build file and the tool that runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildScript {
    /// File that must exist in the project root.
    pub file: &'static str,
    /// Tool to run. `None` means the file itself is executed.
    pub tool: Option<&'static str>,
}

/// Build scripts, in the order they are tried.
pub const BUILD_SCRIPTS: &[BuildScript] = &[
    BuildScript { file: "build", tool: None },
    BuildScript { file: "build.sh", tool: None },
    BuildScript { file: "Makefile", tool: Some("make") },
    BuildScript { file: "makefile", tool: Some("make") },
    BuildScript { file: "GNUmakefile", tool: Some("make") },
    BuildScript { file: "build.ninja", tool: Some("ninja") },
];

impl BuildScript {
    fn program(&self, cwd: &Path) -> OsString {
        match self.tool {
            Some(tool) => OsString::from(tool),
            None => cwd.join(self.file).into_os_string(),
        }
    }
}

/// Try each build script that exists in `cwd` until one works.
///
/// A script works if it exits successfully and `go list` then reports no
/// dependency errors. Returns `false` if no script worked or none exists.
pub fn autobuild(
    runner: &dyn CommandRunner,
    toolchain: &dyn Toolchain,
    cwd: &Path,
    env: &EnvOverlay,
) -> bool {
    let options = CommandOptions::inherited(cwd, env);

    for script in BUILD_SCRIPTS {
        if !cwd.join(script.file).is_file() {
            continue;
        }
        tracing::info!("{} found.", script.file);

        if runner.run_check(&script.program(cwd), &[], &options)
            && !toolchain.dep_errors(cwd, env, "./...", &[])
        {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::MockRunner;
    use crate::toolchain::MockToolchain;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn no_build_files_means_no_build() {
        let temp = TempDir::new().unwrap();
        let runner = MockRunner::new();

        assert!(!autobuild(
            &runner,
            &MockToolchain::new("1.20"),
            temp.path(),
            &EnvOverlay::default()
        ));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn makefile_build_succeeds() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Makefile"), "all:\n").unwrap();
        let runner = MockRunner::new();
        let go = MockToolchain::new("1.20");

        assert!(autobuild(&runner, &go, temp.path(), &EnvOverlay::default()));
        assert_eq!(runner.lines(), vec!["make"]);
        assert_eq!(go.calls(), vec!["list ./..."]);
    }

    #[test]
    fn build_script_is_executed_directly() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("build.sh"), "#!/bin/sh\n").unwrap();
        let runner = MockRunner::new();

        assert!(autobuild(
            &runner,
            &MockToolchain::new("1.20"),
            temp.path(),
            &EnvOverlay::default()
        ));
        assert_eq!(runner.calls()[0].program, "build.sh");
    }

    #[test]
    fn falls_through_to_next_script_on_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Makefile"), "").unwrap();
        fs::write(temp.path().join("build.ninja"), "").unwrap();
        let runner = MockRunner::new().with_exit_code("make", 2);

        assert!(autobuild(
            &runner,
            &MockToolchain::new("1.20"),
            temp.path(),
            &EnvOverlay::default()
        ));
        assert_eq!(runner.lines(), vec!["make", "ninja"]);
    }

    #[test]
    fn remaining_dependency_errors_fail_the_build() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("GNUmakefile"), "").unwrap();
        let runner = MockRunner::new();
        let go = MockToolchain::new("1.20").with_dep_errors(true);

        assert!(!autobuild(&runner, &go, temp.path(), &EnvOverlay::default()));
    }
}
