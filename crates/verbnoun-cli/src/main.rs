//! Entry point for the `verbnoun` binary.
//!
//! The binary dispatches to the built-in handlers only. Applications with
//! their own handlers call [`verbnoun_cli::run_with_catalog`] from their own
//! `main`.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    verbnoun_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
