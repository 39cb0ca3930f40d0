//! The whole pipeline behind a binary's `main`.

use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use camino::Utf8Path;
use tracing::debug;
use verbnoun_config::Config;

use super::{DISPATCH_TARGET, DispatchError, Dispatcher};
use crate::catalog::HandlerSource;

/// Inputs to [`run_entry_point`].
#[derive(Debug, Clone, Copy)]
pub struct EntryRequest<'a> {
    /// Configuration document to load.
    pub config_path: &'a Utf8Path,
    /// Command tokens after the program name.
    pub tokens: &'a [String],
}

/// Bootstraps a dispatcher for `config` and dispatches `tokens`.
///
/// # Errors
///
/// Propagates every [`DispatchError`] raised on the way.
pub fn execute<S>(
    config: Arc<Config>,
    source: &S,
    tokens: &[String],
    out: &mut dyn Write,
) -> Result<(), DispatchError>
where
    S: HandlerSource + ?Sized,
{
    Dispatcher::bootstrap(config, source)?.dispatch(tokens, out)
}

/// Converts a dispatch outcome into an exit code, printing diagnostics.
///
/// Help text goes to `stdout`; every other failure is written to `stderr`.
pub fn report<'a>(
    result: Result<(), DispatchError>,
    stdout: &'a mut dyn Write,
    stderr: &'a mut dyn Write,
) -> ExitCode {
    let Err(error) = result else {
        return ExitCode::SUCCESS;
    };
    let stream = if error.is_help() { stdout } else { stderr };
    if let Err(write_error) = write!(stream, "{}", with_newline(&error.to_string())) {
        debug!(
            target: DISPATCH_TARGET,
            error = %write_error,
            "failed to write diagnostic"
        );
    }
    ExitCode::from(error.exit_status())
}

/// Loads `request.config_path`, then discovers, parses, and runs.
#[must_use]
pub fn run_entry_point<S>(
    request: EntryRequest<'_>,
    source: &S,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> ExitCode
where
    S: HandlerSource + ?Sized,
{
    let result = Config::load(request.config_path)
        .map_err(DispatchError::from)
        .and_then(|config| execute(Arc::new(config), source, request.tokens, &mut *stdout));
    report(result, stdout, stderr)
}

fn with_newline(message: &str) -> String {
    if message.ends_with('\n') {
        message.to_owned()
    } else {
        format!("{message}\n")
    }
}
