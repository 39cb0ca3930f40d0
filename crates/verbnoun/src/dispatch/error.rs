//! Dispatch failures and their exit statuses.

use thiserror::Error;
use verbnoun_config::ConfigError;

use super::Stage;
use crate::registry::RegistryError;
use crate::schema::ArgumentError;

/// Message printed when no handler answers a valid `verb noun` pair.
pub const UNKNOWN_COMMAND_MESSAGE: &str = "invalid command. Not yet implemented, try again.";

/// Coarse failure category recorded in [`super::Stage::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Configuration or environment file.
    Config,
    /// Handler discovery.
    Discovery,
    /// Either argument parsing phase.
    Arguments,
    /// No handler for the pair.
    UnknownCommand,
    /// Handler construction or execution.
    Handler,
    /// The dispatcher was asked to run a second command.
    Reused,
}

/// Errors surfaced while dispatching a command line.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Configuration could not be loaded or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Handler discovery failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Argument parsing failed or help was requested.
    #[error(transparent)]
    Arguments(#[from] ArgumentError),

    /// The vocabulary admits the pair but no handler is registered for it.
    #[error("{}", UNKNOWN_COMMAND_MESSAGE)]
    UnknownCommand {
        /// First token.
        verb: String,
        /// Second token.
        noun: String,
    },

    /// The handler failed to construct or run.
    #[error("command '{key}' failed: {source:#}")]
    Handler {
        /// Dispatch key of the failing handler.
        key: String,
        /// Error reported by the handler.
        #[source]
        source: anyhow::Error,
    },

    /// The dispatcher has already handled a command line.
    #[error("dispatcher already used (stage {stage:?})")]
    AlreadyDispatched {
        /// Stage the dispatcher had reached.
        stage: Stage,
    },
}

impl DispatchError {
    /// Returns the process exit status for this error.
    ///
    /// Command-line and handler failures return status 1. Configuration,
    /// discovery and argument-schema failures return status 2, as does reuse
    /// of a dispatcher. Help requests return 0.
    #[must_use]
    pub const fn exit_status(&self) -> u8 {
        match self {
            Self::Arguments(ArgumentError::Help { .. }) => 0,
            Self::Config(_)
            | Self::Registry(_)
            | Self::Arguments(ArgumentError::InvalidSchema { .. })
            | Self::AlreadyDispatched { .. } => 2,
            Self::Arguments(_) | Self::UnknownCommand { .. } | Self::Handler { .. } => 1,
        }
    }

    /// Category used for the failed stage.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Config(_) => FailureKind::Config,
            Self::Registry(_) => FailureKind::Discovery,
            Self::Arguments(_) => FailureKind::Arguments,
            Self::UnknownCommand { .. } => FailureKind::UnknownCommand,
            Self::Handler { .. } => FailureKind::Handler,
            Self::AlreadyDispatched { .. } => FailureKind::Reused,
        }
    }

    /// True when the user asked for help.
    #[must_use]
    pub const fn is_help(&self) -> bool {
        matches!(self, Self::Arguments(error) if error.is_help())
    }
}
