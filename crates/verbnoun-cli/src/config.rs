//! Configuration loading and program-flag splitting.
//!
//! Program flags must precede the `verb noun` pair. Everything from the first
//! token that is not a program flag onwards belongs to the dispatched command.

use std::ffi::{OsStr, OsString};

use camino::Utf8Path;
use verbnoun_config::Config;

use crate::AppError;

/// Program flags recognised before the command tokens.
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &["--config-path", "--log-filter", "--log-format"];

pub(crate) trait ConfigLoader {
    /// Loads the configuration document at `path`.
    fn load(&self, path: &Utf8Path) -> Result<Config, AppError>;
}

pub(crate) struct FileConfigLoader;

impl ConfigLoader for FileConfigLoader {
    fn load(&self, path: &Utf8Path) -> Result<Config, AppError> {
        Config::load(path).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    let (flag, inline_value) = match text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (&*text, false),
    };
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline_value,
        }
    } else {
        FlagAction::Stop
    }
}

/// Program arguments (with the binary name) and the command tokens.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_tokens: Vec<OsString>,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let mut remaining = args.iter();
    let mut split = ConfigArgumentSplit::default();
    split.config_arguments.extend(remaining.next().cloned());

    let mut pending_value = false;
    for argument in remaining.by_ref() {
        if pending_value {
            split.config_arguments.push(argument.clone());
            pending_value = false;
            continue;
        }
        match classify(argument) {
            FlagAction::Include { needs_value } => {
                split.config_arguments.push(argument.clone());
                pending_value = needs_value;
            }
            FlagAction::Stop => {
                split.command_tokens.push(argument.clone());
                break;
            }
        }
    }
    split.command_tokens.extend(remaining.cloned());
    split
}
