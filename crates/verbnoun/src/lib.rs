//! Verb/noun command discovery and dispatch.
//!
//! An application registers its command handlers in a [`Catalog`] under
//! module paths, lists the paths to search in its configuration, and hands
//! the raw command line to [`run_entry_point`]. The framework then:
//!
//! 1. loads the configuration and, when asked, the environment file;
//! 2. discovers the handlers under each search path and indexes them by a
//!    key derived from their type name (`NewFile` answers `new_file`);
//! 3. parses the leading `verb noun` tokens against the configured
//!    vocabulary;
//! 4. parses the remaining tokens against the matched handler's schema;
//! 5. constructs the handler and runs it once.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::io::Write;
//!
//! use verbnoun::{ArgumentSchema, ArgumentSpec, Catalog, EntryPoint, Handler, HandlerContext};
//!
//! struct NewFile {
//!     name: String,
//! }
//!
//! impl Handler for NewFile {
//!     fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
//!         writeln!(out, "creating {}", self.name)?;
//!         Ok(())
//!     }
//! }
//!
//! impl EntryPoint for NewFile {
//!     fn schema() -> ArgumentSchema {
//!         ArgumentSchema::new().with(ArgumentSpec::flag("name").required())
//!     }
//!
//!     fn new(context: HandlerContext) -> anyhow::Result<Self> {
//!         let name = context.arguments.text("name").unwrap_or_default().to_owned();
//!         Ok(Self { name })
//!     }
//! }
//!
//! let catalog = Catalog::new().register::<NewFile>("spam/terminal");
//! ```

pub mod catalog;
pub mod dispatch;
pub mod handler;
pub mod naming;
pub mod registry;
pub mod schema;

#[cfg(test)]
mod tests;

pub use self::catalog::{Candidate, Catalog, HandlerSource};
pub use self::dispatch::{
    DISPATCH_TARGET, DispatchError, Dispatcher, EntryRequest, FailureKind, Stage,
    UNKNOWN_COMMAND_MESSAGE, execute, report, run_entry_point,
};
pub use self::handler::{EntryPoint, Factory, Handler, HandlerContext, HandlerEntry};
pub use self::naming::{derive_key, validate_key};
pub use self::registry::{HandlerDescriptor, HandlerRegistry, RegistryError};
pub use self::schema::{
    ArgKind, ArgValue, ArgumentError, ArgumentSchema, ArgumentSpec, ParsedArguments, TokenRole,
    VerbNoun, parse_verb_noun,
};
pub use verbnoun_config::{Config, ConfigError, ResourceKind};
