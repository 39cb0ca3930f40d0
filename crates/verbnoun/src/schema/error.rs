//! Errors raised by either argument parsing phase.

use std::fmt;

use thiserror::Error;

/// Which vocabulary token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole {
    /// First token.
    Verb,
    /// Second token.
    Noun,
}

impl fmt::Display for TokenRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Verb => "verb",
            Self::Noun => "noun",
        })
    }
}

/// Argument parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// A vocabulary token is not configured.
    #[error("unknown {role} '{token}' (expected one of: {})", expected.join(", "))]
    UnknownVerbOrNoun {
        /// Position of the rejected token.
        role: TokenRole,
        /// Token as typed.
        token: String,
        /// Configured alternatives.
        expected: Vec<String>,
    },

    /// A token does not match any declared flag or positional.
    #[error("unrecognised argument: {message}")]
    UnrecognizedArgument {
        /// Parser diagnostic.
        message: String,
    },

    /// A required token is absent.
    #[error("missing argument: {message}")]
    MissingArgument {
        /// Parser diagnostic.
        message: String,
    },

    /// A value could not be converted to its declared kind.
    #[error("invalid value: {message}")]
    InvalidValue {
        /// Parser diagnostic.
        message: String,
    },

    /// A handler declared arguments that cannot be parsed together.
    #[error("invalid argument schema: {message}")]
    InvalidSchema {
        /// The conflicting declaration.
        message: String,
    },

    /// The user asked for help; `text` is the rendered usage.
    #[error("{text}")]
    Help {
        /// Rendered help text.
        text: String,
    },
}

impl ArgumentError {
    /// Maps a clap failure onto the argument taxonomy.
    pub(crate) fn from_clap(error: &clap::Error) -> Self {
        use clap::error::ErrorKind;

        let message = first_line(error);
        match error.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            | ErrorKind::DisplayVersion => Self::Help {
                text: error.render().to_string(),
            },
            ErrorKind::MissingRequiredArgument | ErrorKind::MissingSubcommand => {
                Self::MissingArgument { message }
            }
            ErrorKind::InvalidValue
            | ErrorKind::ValueValidation
            | ErrorKind::InvalidUtf8
            | ErrorKind::WrongNumberOfValues
            | ErrorKind::TooFewValues => Self::InvalidValue { message },
            _ => Self::UnrecognizedArgument { message },
        }
    }

    /// True when the failure is a help request rather than a usage error.
    #[must_use]
    pub const fn is_help(&self) -> bool {
        matches!(self, Self::Help { .. })
    }
}

fn first_line(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let line = rendered.lines().next().unwrap_or_default();
    line.trim_start_matches("error: ").to_owned()
}
