//! CLI argument definitions.
//!
//! The main entry point is the [`Cli`] struct. Without arguments the
//! autobuilder builds the project; `--identify-environment` only works out
//! which Go version the environment needs.

use clap::Parser;

const AFTER_HELP: &str = "\
Build behavior:

    When LGTM_SRC is not set, dependencies are installed in the working directory and the
    extractor is then run there.

    If LGTM_SRC is set, the files 'go.mod', 'Gopkg.toml' and 'glide.yaml' decide how dependencies
    are installed: 'go get' with modules, 'dep ensure', 'glide install', or 'go get' otherwise.
    Unless a 'go.mod' file is found, the sources are moved into a temporary GOPATH at the folder
    matching the import path of the package.

    LGTM_INDEX_NEED_GOPATH=false disables the GOPATH set-up. CODEQL_EXTRACTOR_GO_BUILD_COMMAND
    (or LGTM_INDEX_BUILD_COMMAND) holds newline-separated commands that replace the default build.
    LGTM_INDEX_IMPORT_PATH overrides the import path, which is otherwise inferred from
    SEMMLE_REPO_URL or GITHUB_REPOSITORY.";

/// Go autobuilder - prepares a Go project and runs the extractor on it.
#[derive(Debug, Default, Parser)]
#[command(name = "go-autobuilder")]
#[command(author, version, about, long_about = None)]
#[command(after_long_help = AFTER_HELP)]
pub struct Cli {
    /// Write an environment file naming the Go version to install, then
    /// exit. The file goes to CODEQL_EXTRACTOR_ENVIRONMENT_JSON, or
    /// 'environment.json' when that is not set.
    #[arg(long)]
    pub identify_environment: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// The mode selected by the arguments.
    pub fn mode(&self) -> Mode {
        if self.identify_environment {
            Mode::IdentifyEnvironment
        } else {
            Mode::Build
        }
    }
}

/// What an invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Install dependencies, build and extract.
    Build,
    /// Write the environment file.
    IdentifyEnvironment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_builds() {
        let cli = Cli::try_parse_from(["go-autobuilder"]).unwrap();
        assert_eq!(cli.mode(), Mode::Build);
        assert!(!cli.debug);
    }

    #[test]
    fn identify_environment_flag() {
        let cli = Cli::try_parse_from(["go-autobuilder", "--identify-environment"]).unwrap();
        assert_eq!(cli.mode(), Mode::IdentifyEnvironment);
    }

    #[test]
    fn debug_combines_with_either_mode() {
        let cli =
            Cli::try_parse_from(["go-autobuilder", "--debug", "--identify-environment"]).unwrap();
        assert!(cli.debug);
        assert_eq!(cli.mode(), Mode::IdentifyEnvironment);
    }

    #[test]
    fn positional_arguments_are_rejected() {
        let err = Cli::try_parse_from(["go-autobuilder", "build"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
