//! Core library entry for the `packref` CLI.
//!
//! Rewrites a closed set of project manifests so that project references
//! between them become package references pinned to one release version.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod context;
pub mod document;
pub mod error;
pub mod logging;
pub mod paths;
pub mod ports;
pub mod project;
pub mod rewrite;

use clap::error::ErrorKind;
use clap::Parser;

pub use error::{PublishError, Result};

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error when argument parsing fails or the publish run fails.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp) => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(PublishError::Usage(err.to_string())),
    };
    logging::init(cli.verbose, cli.quiet);
    commands::dispatch(&cli)
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::PublishError;

    #[test]
    fn run_without_paths_is_a_noop() {
        assert!(run(["packref", "--version", "2.0.0"]).is_ok());
    }

    #[test]
    fn run_errors_without_version() {
        let result = run(["packref", "/w/A.csproj"]);
        assert!(matches!(result, Err(PublishError::Usage(_))));
    }

    #[test]
    fn run_rejects_relative_paths() {
        let result = run(["packref", "--version", "2.0.0", "A/A.csproj"]);
        assert!(matches!(result, Err(PublishError::RelativePath(ref p)) if p == "A/A.csproj"));
    }
}
