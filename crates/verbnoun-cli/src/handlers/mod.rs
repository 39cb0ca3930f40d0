//! Handlers shipped with the runner.
//!
//! They are registered under [`BUILTIN_MODULE`]; an application exposes them
//! by listing that path in `entrypoints` and adding their verbs and nouns to
//! its vocabulary.

mod list_commands;
mod list_configs;
mod show_connection;

use verbnoun::Catalog;

pub use self::list_commands::ListCommands;
pub use self::list_configs::{ConfigFormat, ListConfigs};
pub use self::show_connection::ShowConnection;

/// Module path the built-in handlers are registered under.
pub const BUILTIN_MODULE: &str = "verbnoun/handlers";

/// Catalog holding every built-in handler.
#[must_use]
pub fn builtin_catalog() -> Catalog {
    Catalog::new()
        .register::<ListCommands>(BUILTIN_MODULE)
        .register::<ListConfigs>(BUILTIN_MODULE)
        .register::<ShowConnection>(BUILTIN_MODULE)
}

/// Renders `verb_noun` as the command line that reaches it.
pub(crate) fn command_line(key: &str) -> String {
    key.replacen('_', " ", 1)
}
