//! Binary entrypoint for the `packref` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match packref::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
