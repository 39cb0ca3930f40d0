//! Error types for the CLI runtime.

use thiserror::Error;
use verbnoun::DispatchError;
use verbnoun_config::ConfigError;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(ConfigError),
    #[error("command token is not valid UTF-8: {token}")]
    InvalidToken { token: String },
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl AppError {
    /// Folds runner failures into the dispatch exit contract.
    pub(crate) fn into_dispatch(self) -> Result<DispatchError, Self> {
        match self {
            Self::LoadConfiguration(error) => Ok(DispatchError::Config(error)),
            Self::Dispatch(error) => Ok(error),
            other => Err(other),
        }
    }
}
