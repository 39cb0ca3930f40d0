//! Errors raised while loading or querying configuration.

use std::io;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising from configuration loading and resource resolution.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path that was checked.
        path: Utf8PathBuf,
    },

    /// The configuration file exists but could not be read.
    #[error("failed to read configuration {path}: {source}")]
    Read {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A required section is missing or has the wrong shape.
    #[error("malformed configuration in {origin}: {message}")]
    Malformed {
        /// File path or label of the offending document.
        origin: String,
        /// Parser or validation message.
        message: String,
    },

    /// The model could not be written back to YAML.
    #[error("failed to serialise configuration: {message}")]
    Serialise {
        /// Emitter message.
        message: String,
    },

    /// A named resource is not configured or its variable is unset.
    #[error("missing connection '{name}': {reason}")]
    MissingConnection {
        /// Logical resource name.
        name: String,
        /// Why the lookup failed.
        reason: String,
    },

    /// The declared environment file does not exist.
    #[error("no environment file found at {path}")]
    EnvFileNotFound {
        /// Path that was checked.
        path: Utf8PathBuf,
    },

    /// The environment file could not be read.
    #[error("failed to read environment file {path}: {source}")]
    EnvFileRead {
        /// Path that was read.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// A line in the environment file is not `KEY=value`.
    #[error("invalid line {line} in environment file {path}")]
    EnvFileSyntax {
        /// Path of the environment file.
        path: Utf8PathBuf,
        /// One-based line number.
        line: usize,
    },
}
