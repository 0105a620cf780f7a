//! Command dispatch and handlers.

pub mod publish;

use crate::cli::Cli;
use crate::context::ServiceContext;
use crate::error::Result;

/// Dispatch parsed arguments to the publish handler against the live filesystem.
///
/// # Errors
///
/// Returns an error if the publish run fails.
pub fn dispatch(cli: &Cli) -> Result<()> {
    let ctx = ServiceContext::live();
    publish::run(&ctx, &publish::PublishOptions::from(cli)).map(|_| ())
}
