//! Library integration tests.

use std::fs;
use std::path::Path;

use go_autobuilder::build::{BuildCoordinator, BuildState};
use go_autobuilder::config::Config;
use go_autobuilder::detection::{ManifestProfile, ModuleMode};
use go_autobuilder::diagnostics::{DiagnosticKind, MockSink};
use go_autobuilder::shell::MockRunner;
use go_autobuilder::toolchain::MockToolchain;
use go_autobuilder::AutobuildError;
use tempfile::TempDir;

#[test]
fn error_types_are_public() {
    let err = AutobuildError::InvalidVersion {
        text: "gox".into(),
    };
    assert!(err.to_string().contains("gox"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> go_autobuilder::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use go_autobuilder::cli::{Cli, Mode};

    let cli = Cli::parse_from(["go-autobuilder", "--identify-environment"]);
    assert_eq!(cli.mode(), Mode::IdentifyEnvironment);
}

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn module_project_builds_with_mocks() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "go.mod", "module example.com/app\n\ngo 1.18\n");
    write(temp.path(), "Makefile", "all:\n\tgo build ./...\n");

    let config = Config::default();
    let toolchain = MockToolchain::new("1.18.2").with_program("/usr/bin/go");
    let runner = MockRunner::new();
    let mut sink = MockSink::new();

    let report = BuildCoordinator::new(&config, &toolchain, &runner, &mut sink)
        .with_extractor("/tools/go-extractor")
        .run(temp.path())
        .unwrap();

    assert_eq!(report.decision.profile, ManifestProfile::ModuleBased);
    assert_eq!(report.decision.module_mode, ModuleMode::Unset);
    assert_eq!(report.states.last(), Some(&BuildState::Extracted));
    assert_eq!(runner.lines(), vec!["make", "go-extractor ./..."]);
    assert!(sink.emitted().is_empty());
}

#[test]
fn old_toolchain_is_reported_but_build_continues() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "go.mod", "module example.com/app\n\ngo 1.20\n");

    let config = Config::default();
    let toolchain = MockToolchain::new("1.15.15").with_program("/usr/bin/go");
    let runner = MockRunner::new();
    let mut sink = MockSink::new();

    BuildCoordinator::new(&config, &toolchain, &runner, &mut sink)
        .with_extractor("/tools/go-extractor")
        .run(temp.path())
        .unwrap();

    assert!(sink.has(DiagnosticKind::NewerGoVersionNeeded));
    assert!(runner.ran("go-extractor"));
}
