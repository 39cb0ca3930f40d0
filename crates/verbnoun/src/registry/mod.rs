//! Discovery and indexing of command handlers.
//!
//! [`HandlerRegistry::discover`] walks the configured search paths in order,
//! asks a [`HandlerSource`] for the candidates under each, derives their
//! dispatch keys, and builds a collision-free index. The index is rebuilt for
//! every dispatch and never mutated afterwards.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use tracing::{debug, warn};
use verbnoun_config::Config;

use crate::catalog::{Candidate, HandlerSource};
use crate::handler::{Handler, HandlerContext, HandlerEntry};
use crate::naming::{CONTRACT_NAME, KeyShape, validate_key};
use crate::schema::ArgumentSchema;

const DISCOVERY_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::discovery");

/// Errors raised while building the handler index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A handler name encodes more than two words.
    #[error(
        "handler '{type_name}' derives key '{key}'; handler names must encode exactly two words: verb + noun"
    )]
    InvalidHandlerName {
        /// Declared type name.
        type_name: String,
        /// Derived dispatch key.
        key: String,
    },

    /// Two distinct handlers derive the same key.
    #[error("handlers '{first}' and '{second}' both resolve to '{key}'")]
    DuplicateHandler {
        /// Contested dispatch key.
        key: String,
        /// Handler indexed first, as `module::Type`.
        first: String,
        /// Handler rejected, as `module::Type`.
        second: String,
    },
}

/// An indexed handler.
#[derive(Debug, Clone)]
pub struct HandlerDescriptor {
    key: String,
    module: String,
    entry: HandlerEntry,
}

impl HandlerDescriptor {
    fn new(key: String, candidate: Candidate) -> Self {
        Self {
            key,
            module: candidate.module().to_owned(),
            entry: *candidate.entry(),
        }
    }

    /// Dispatch key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Module path the handler was registered under.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Declared type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.entry.type_name()
    }

    /// Argument schema for phase-two parsing.
    #[must_use]
    pub fn schema(&self) -> ArgumentSchema {
        self.entry.schema()
    }

    /// Constructs a handler instance.
    ///
    /// # Errors
    ///
    /// Propagates the handler's construction error.
    pub fn construct(&self, context: HandlerContext) -> anyhow::Result<Box<dyn Handler>> {
        self.entry.construct(context)
    }

    fn qualified_name(&self) -> String {
        format!("{}::{}", self.module, self.type_name())
    }
}

/// Index of handlers keyed by dispatch key.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    index: BTreeMap<String, HandlerDescriptor>,
}

impl HandlerRegistry {
    /// Discovers handlers under each search path, in order.
    ///
    /// Unknown search paths are skipped with a warning. The handler contract
    /// itself is never indexed, and a handler reached through overlapping
    /// search paths is indexed once.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidHandlerName`] for a handler whose name
    /// has more than two words and [`RegistryError::DuplicateHandler`] when
    /// two handlers derive the same key.
    pub fn discover<S>(search_paths: &[String], source: &S) -> Result<Self, RegistryError>
    where
        S: HandlerSource + ?Sized,
    {
        let mut registry = Self::default();
        for path in search_paths {
            let Some(candidates) = source.candidates(path) else {
                warn!(
                    target: DISCOVERY_TARGET,
                    search_path = %path,
                    "no handlers registered under search path"
                );
                continue;
            };
            for candidate in candidates {
                registry.admit(candidate)?;
            }
        }
        debug!(
            target: DISCOVERY_TARGET,
            handlers = registry.len(),
            "handler index built"
        );
        Ok(registry)
    }

    fn admit(&mut self, candidate: Candidate) -> Result<(), RegistryError> {
        let type_name = candidate.entry().type_name();
        if type_name == CONTRACT_NAME {
            debug!(
                target: DISCOVERY_TARGET,
                module = candidate.module(),
                "skipping handler contract type"
            );
            return Ok(());
        }
        let key = candidate.entry().key();
        if validate_key(type_name, &key)? == KeyShape::SingleWord {
            warn!(
                target: DISCOVERY_TARGET,
                handler = type_name,
                key = %key,
                "handler key has no verb/noun separator and cannot be dispatched"
            );
        }
        match self.index.entry(key) {
            Entry::Occupied(existing) => {
                let indexed = existing.get();
                if indexed.entry.type_id() == candidate.entry().type_id() {
                    debug!(
                        target: DISCOVERY_TARGET,
                        key = indexed.key(),
                        "handler already indexed"
                    );
                    return Ok(());
                }
                Err(RegistryError::DuplicateHandler {
                    key: indexed.key().to_owned(),
                    first: indexed.qualified_name(),
                    second: format!("{}::{type_name}", candidate.module()),
                })
            }
            Entry::Vacant(slot) => {
                debug!(
                    target: DISCOVERY_TARGET,
                    key = slot.key().as_str(),
                    module = candidate.module(),
                    handler = type_name,
                    "handler indexed"
                );
                let indexed_key = slot.key().clone();
                slot.insert(HandlerDescriptor::new(indexed_key, candidate));
                Ok(())
            }
        }
    }

    /// Looks up a handler by dispatch key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HandlerDescriptor> {
        self.index.get(key)
    }

    /// Dispatch keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.index.keys().cloned().collect()
    }

    /// Indexed handlers in key order.
    pub fn iter(&self) -> impl Iterator<Item = &HandlerDescriptor> {
        self.index.values()
    }

    /// Number of indexed handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no handler was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Vocabulary pairs with no handler, in vocabulary order.
    #[must_use]
    pub fn unmatched_commands(&self, config: &Config) -> Vec<String> {
        unmatched_commands(config, |key| self.index.contains_key(key))
    }

    /// Handlers whose key no vocabulary pair can produce.
    #[must_use]
    pub fn orphan_handlers(&self, config: &Config) -> Vec<&HandlerDescriptor> {
        let reachable: BTreeSet<String> = config.verb_noun_map().into_iter().collect();
        self.iter()
            .filter(|descriptor| !reachable.contains(descriptor.key()))
            .collect()
    }
}

/// Vocabulary pairs for which `is_registered` answers false, in vocabulary
/// order.
///
/// Handlers that only see the sorted key list use this to match
/// [`HandlerRegistry::unmatched_commands`].
#[must_use]
pub fn unmatched_commands<F>(config: &Config, is_registered: F) -> Vec<String>
where
    F: Fn(&str) -> bool,
{
    config
        .verb_noun_map()
        .into_iter()
        .filter(|key| !is_registered(key))
        .collect()
}
