//! Command-line runner for verbnoun applications.
//!
//! The runner peels program flags (`--config-path`, `--log-filter`,
//! `--log-format`) off the front of the argument list, installs logging,
//! loads the configuration, and hands the remaining tokens to the dispatcher.
//! Configuration loading and IO streams can be substituted from tests.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use verbnoun::HandlerSource;
use verbnoun_config::LogSettings;

mod cli;
mod config;
mod errors;
pub mod handlers;
pub mod telemetry;

use cli::Cli;
use config::{ConfigLoader, FileConfigLoader, split_config_arguments};
use errors::AppError;
pub use handlers::{BUILTIN_MODULE, builtin_catalog};

/// Exit status for failures that happen before dispatch starts.
const RUNNER_FAILURE: u8 = 2;

/// Bundles the IO streams provided to the runner.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) const fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self { stdout, stderr }
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader, S: HandlerSource + ?Sized> {
    io: IoStreams<'a, W, E>,
    loader: &'a L,
    source: &'a S,
}

impl<'a, W, E, L, S> CliRunner<'a, W, E, L, S>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
    S: HandlerSource + ?Sized,
{
    const fn new(io: IoStreams<'a, W, E>, loader: &'a L, source: &'a S) -> Self {
        Self { io, loader, source }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        let split = split_config_arguments(&args);

        let result = Cli::try_parse_from(&split.config_arguments)
            .map_err(AppError::CliUsage)
            .and_then(|cli| {
                telemetry::initialise(&LogSettings::new(cli.log_filter.clone(), cli.log_format))?;
                self.loader.load(&cli.config_path)
            })
            .and_then(|config| {
                let tokens = utf8_tokens(&split.command_tokens)?;
                verbnoun::execute(
                    Arc::new(config),
                    self.source,
                    &tokens,
                    &mut *self.io.stdout,
                )
                .map_err(AppError::from)
            });

        let Err(error) = result else {
            return ExitCode::SUCCESS;
        };
        match error.into_dispatch() {
            Ok(dispatch_error) => verbnoun::report(
                Err(dispatch_error),
                &mut *self.io.stdout,
                &mut *self.io.stderr,
            ),
            Err(runner_error) => {
                if writeln!(self.io.stderr, "{runner_error}").is_err() {
                    return ExitCode::FAILURE;
                }
                ExitCode::from(RUNNER_FAILURE)
            }
        }
    }
}

fn utf8_tokens(tokens: &[OsString]) -> Result<Vec<String>, AppError> {
    tokens
        .iter()
        .map(|token| {
            token.to_str().map(str::to_owned).ok_or_else(|| AppError::InvalidToken {
                token: token.to_string_lossy().into_owned(),
            })
        })
        .collect()
}

/// Runs the built-in handlers using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_catalog(args, &builtin_catalog(), stdout, stderr)
}

/// Runs an application's handlers using the provided arguments and IO
/// handles.
///
/// `source` is typically the application's catalog merged with
/// [`builtin_catalog`].
#[must_use]
pub fn run_with_catalog<I, S, W, E>(args: I, source: &S, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    S: HandlerSource + ?Sized,
    W: Write,
    E: Write,
{
    let io = IoStreams::new(stdout, stderr);
    run_with_loader(args, io, &FileConfigLoader, source)
}

fn run_with_loader<I, W, E, L, S>(
    args: I,
    io: IoStreams<'_, W, E>,
    loader: &L,
    source: &S,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
    S: HandlerSource + ?Sized,
{
    CliRunner::new(io, loader, source).run(args)
}
