//! Explicit handler registration.
//!
//! Handlers are listed at start-up against the module path they live under.
//! Discovery asks a [`HandlerSource`] for everything reachable from each
//! configured search path; [`Catalog`] is the in-process implementation.

use crate::handler::{EntryPoint, HandlerEntry};

/// A handler registered under a module path.
#[derive(Debug, Clone)]
pub struct Candidate {
    module: String,
    entry: HandlerEntry,
}

impl Candidate {
    /// Pairs an entry with its module path.
    #[must_use]
    pub fn new(module: impl Into<String>, entry: HandlerEntry) -> Self {
        Self {
            module: module.into(),
            entry,
        }
    }

    /// Module path the handler was registered under.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// The registered handler.
    #[must_use]
    pub const fn entry(&self) -> &HandlerEntry {
        &self.entry
    }
}

/// Supplies handler candidates for a search path.
pub trait HandlerSource {
    /// Returns every candidate registered at `search_path` or below it, in
    /// registration order, or `None` when the path is unknown.
    fn candidates(&self, search_path: &str) -> Option<Vec<Candidate>>;
}

/// Ordered list of handler registrations.
///
/// # Example
///
/// ```ignore
/// let catalog = Catalog::new()
///     .register::<NewFile>("spam/terminal")
///     .register::<ListConfigs>("spam/terminal/admin");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    registrations: Vec<Candidate>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` under `module`.
    #[must_use]
    pub fn register<T: EntryPoint>(mut self, module: impl Into<String>) -> Self {
        self.add(module, HandlerEntry::of::<T>());
        self
    }

    /// Registers an already erased entry.
    pub fn add(&mut self, module: impl Into<String>, entry: HandlerEntry) {
        let path: String = module.into();
        self.registrations.push(Candidate::new(normalise(&path), entry));
    }

    /// Appends every registration from `other`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.registrations.extend(other.registrations);
        self
    }

    /// Number of registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl HandlerSource for Catalog {
    fn candidates(&self, search_path: &str) -> Option<Vec<Candidate>> {
        let root = normalise(search_path);
        let found: Vec<Candidate> = self
            .registrations
            .iter()
            .filter(|candidate| is_within(candidate.module(), root))
            .cloned()
            .collect();
        (!found.is_empty()).then_some(found)
    }
}

fn normalise(path: &str) -> &str {
    path.trim_matches('/')
}

fn is_within(module: &str, root: &str) -> bool {
    root.is_empty()
        || module == root
        || module
            .strip_prefix(root)
            .is_some_and(|rest| rest.starts_with('/'))
}
