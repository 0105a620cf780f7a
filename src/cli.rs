//! CLI argument definitions.

use clap::{ArgAction, Parser};

/// Top-level CLI parser for `packref`.
///
/// `--version` is the release version to stamp, so clap's own version flag
/// is disabled.
#[derive(Debug, Parser)]
#[command(
    name = "packref",
    about = "Replace project references with versioned package references",
    disable_version_flag = true
)]
pub struct Cli {
    /// Release version stamped into every manifest and pinned on every package reference.
    #[arg(long, value_name = "VERSION")]
    pub version: String,

    /// Rewrite in memory and report, but leave files untouched.
    #[arg(long)]
    pub dry_run: bool,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Absolute paths of the project manifests to rewrite.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,
}
