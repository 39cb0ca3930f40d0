//! The contract every command handler satisfies.
//!
//! A handler is constructed once from a [`HandlerContext`], run once, and
//! dropped. Implementations provide [`EntryPoint`]; the dispatcher only ever
//! holds a `Box<dyn Handler>`.

use std::any::{TypeId, type_name};
use std::fmt;
use std::io::Write;
use std::sync::Arc;

use verbnoun_config::Config;

use crate::naming::{derive_key, short_type_name};
use crate::schema::{ArgumentSchema, ParsedArguments};

/// Runs a constructed command.
pub trait Handler {
    /// Executes the command, writing user-facing output to `out`.
    ///
    /// # Errors
    ///
    /// Any failure is reported to the user as a handler error.
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Construction and metadata for a concrete handler type.
pub trait EntryPoint: Handler + Sized + 'static {
    /// Declared type name used to derive the dispatch key.
    #[must_use]
    fn type_name() -> &'static str {
        short_type_name(type_name::<Self>())
    }

    /// Dispatch key the handler is indexed under.
    ///
    /// Defaults to the snake_case form of [`EntryPoint::type_name`]. An
    /// override is still held to the two-word rule.
    #[must_use]
    fn name() -> String {
        derive_key(Self::type_name())
    }

    /// Arguments accepted after the `verb noun` pair.
    #[must_use]
    fn schema() -> ArgumentSchema {
        ArgumentSchema::default()
    }

    /// Builds the handler for a single run.
    ///
    /// # Errors
    ///
    /// Returns an error when the context cannot satisfy the handler.
    fn new(context: HandlerContext) -> anyhow::Result<Self>;
}

/// Everything a handler receives at construction.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    /// Configuration loaded for this process.
    pub config: Arc<Config>,
    /// Phase-two arguments parsed against the handler's schema.
    pub arguments: ParsedArguments,
    /// Dispatch keys indexed for this invocation, sorted.
    pub registered: Arc<[String]>,
}

/// Boxed constructor stored in the registry.
pub type Factory = fn(HandlerContext) -> anyhow::Result<Box<dyn Handler>>;

/// A registrable handler type, erased to function pointers.
#[derive(Clone, Copy)]
pub struct HandlerEntry {
    type_id: TypeId,
    type_name: &'static str,
    name: fn() -> String,
    schema: fn() -> ArgumentSchema,
    factory: Factory,
}

impl HandlerEntry {
    /// Captures `T` for registration.
    #[must_use]
    pub fn of<T: EntryPoint>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: T::type_name(),
            name: T::name,
            schema: T::schema,
            factory: construct::<T>,
        }
    }

    /// Identity of the concrete handler type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Declared type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Dispatch key reported by the handler.
    #[must_use]
    pub fn key(&self) -> String {
        (self.name)()
    }

    /// Argument schema of the handler.
    #[must_use]
    pub fn schema(&self) -> ArgumentSchema {
        (self.schema)()
    }

    /// Constructs a fresh handler instance.
    ///
    /// # Errors
    ///
    /// Propagates the handler's construction error.
    pub fn construct(&self, context: HandlerContext) -> anyhow::Result<Box<dyn Handler>> {
        (self.factory)(context)
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

fn construct<T: EntryPoint>(context: HandlerContext) -> anyhow::Result<Box<dyn Handler>> {
    Ok(Box::new(T::new(context)?))
}
