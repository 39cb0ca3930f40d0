//! Resolution of a command line to a single handler run.
//!
//! A [`Dispatcher`] moves through the [`Stage`]s below exactly once per
//! process. Every transition is logged at `debug` under the dispatch target
//! so a failing invocation can be traced with `--log-filter debug`.
//!
//! ```text
//! Idle -> ConfigLoaded -> HandlersIndexed -> VerbNounParsed
//!      -> HandlerResolved -> ArgsParsed -> Running -> Done
//! ```
//!
//! Any transition may instead end in [`Stage::Failed`].

mod entry;
mod error;

use std::io::Write;
use std::sync::Arc;

use tracing::debug;
use verbnoun_config::Config;

use crate::catalog::HandlerSource;
use crate::handler::HandlerContext;
use crate::registry::{HandlerDescriptor, HandlerRegistry};
use crate::schema::parse_verb_noun;

pub use self::entry::{EntryRequest, execute, report, run_entry_point};
pub use self::error::{DispatchError, FailureKind, UNKNOWN_COMMAND_MESSAGE};

/// Tracing target for dispatch stage transitions.
pub const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Progress of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing has happened yet.
    Idle,
    /// Configuration and environment file are loaded.
    ConfigLoaded,
    /// The handler index is built.
    HandlersIndexed,
    /// Phase one selected a `verb noun` pair.
    VerbNounParsed,
    /// A handler answers the pair.
    HandlerResolved,
    /// Phase two parsed the handler's arguments.
    ArgsParsed,
    /// The handler is running.
    Running,
    /// The handler finished successfully.
    Done,
    /// Dispatch stopped with an error.
    Failed(FailureKind),
}

/// Resolves and runs commands against a handler index.
#[derive(Debug)]
pub struct Dispatcher {
    config: Arc<Config>,
    registry: HandlerRegistry,
    stage: Stage,
}

impl Dispatcher {
    /// Wraps an existing index.
    #[must_use]
    pub const fn new(config: Arc<Config>, registry: HandlerRegistry) -> Self {
        Self {
            config,
            registry,
            stage: Stage::HandlersIndexed,
        }
    }

    /// Loads the environment file and discovers handlers for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Config`] when the declared environment file
    /// cannot be loaded and [`DispatchError::Registry`] when discovery fails.
    pub fn bootstrap<S>(config: Arc<Config>, source: &S) -> Result<Self, DispatchError>
    where
        S: HandlerSource + ?Sized,
    {
        let mut stage = Stage::Idle;
        let loaded = config
            .load_environment()
            .map_err(DispatchError::from)
            .inspect_err(|error| advance(&mut stage, Stage::Failed(error.kind())))?;
        debug!(
            target: DISPATCH_TARGET,
            env_vars = loaded.unwrap_or_default(),
            "environment prepared"
        );
        advance(&mut stage, Stage::ConfigLoaded);
        let registry = HandlerRegistry::discover(config.entrypoints(), source)
            .map_err(DispatchError::from)
            .inspect_err(|error| advance(&mut stage, Stage::Failed(error.kind())))?;
        advance(&mut stage, Stage::HandlersIndexed);
        Ok(Self {
            config,
            registry,
            stage,
        })
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Handler index.
    #[must_use]
    pub const fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Looks up the handler for `verb noun`.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownCommand`] when no handler is indexed
    /// under `verb_noun`.
    pub fn resolve(&self, verb: &str, noun: &str) -> Result<&HandlerDescriptor, DispatchError> {
        self.registry
            .get(&format!("{verb}_{noun}"))
            .ok_or_else(|| DispatchError::UnknownCommand {
                verb: verb.to_owned(),
                noun: noun.to_owned(),
            })
    }

    /// Parses `tokens`, constructs the matching handler, and runs it once.
    ///
    /// A dispatcher handles a single command line; later calls leave the
    /// recorded stage untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::AlreadyDispatched`] when called again,
    /// [`DispatchError::Config`] for an empty vocabulary,
    /// [`DispatchError::Arguments`] when either parsing phase fails,
    /// [`DispatchError::UnknownCommand`] when no handler answers the pair, and
    /// [`DispatchError::Handler`] when the handler fails.
    pub fn dispatch(&mut self, tokens: &[String], out: &mut dyn Write) -> Result<(), DispatchError> {
        if self.stage != Stage::HandlersIndexed {
            return Err(DispatchError::AlreadyDispatched { stage: self.stage });
        }
        let result = self.run_pipeline(tokens, out);
        if let Err(error) = &result {
            advance(&mut self.stage, Stage::Failed(error.kind()));
        }
        result
    }

    fn run_pipeline(&mut self, tokens: &[String], out: &mut dyn Write) -> Result<(), DispatchError> {
        self.config.validate_vocabulary()?;
        let (pair, rest) = parse_verb_noun(
            self.config.app_name(),
            self.config.verbs(),
            self.config.nouns(),
            tokens,
        )?;
        advance(&mut self.stage, Stage::VerbNounParsed);

        let descriptor = self.resolve(&pair.verb, &pair.noun)?.clone();
        advance(&mut self.stage, Stage::HandlerResolved);

        let arguments = descriptor.schema().parse(descriptor.key(), rest)?;
        advance(&mut self.stage, Stage::ArgsParsed);

        let context = HandlerContext {
            config: Arc::clone(&self.config),
            arguments,
            registered: self.registry.keys().into(),
        };
        let handler_error = |source| DispatchError::Handler {
            key: descriptor.key().to_owned(),
            source,
        };
        let mut handler = descriptor.construct(context).map_err(handler_error)?;
        advance(&mut self.stage, Stage::Running);
        handler.run(out).map_err(handler_error)?;
        advance(&mut self.stage, Stage::Done);
        Ok(())
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(target: DISPATCH_TARGET, from = ?stage, to = ?next, "dispatch stage");
    *stage = next;
}

#[cfg(test)]
mod tests;
