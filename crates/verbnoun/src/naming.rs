//! Dispatch key derivation from handler type names.
//!
//! Handler types follow a two-word `VerbNoun` naming convention. The key is
//! the snake-case form of that name, so `NewFile` answers `new file` on the
//! command line through the key `new_file`.

use crate::registry::RegistryError;

/// Type name reserved for the handler contract itself.
pub const CONTRACT_NAME: &str = "Handler";

/// Shape of a validated dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    /// `verb_noun`: reachable from the command line.
    VerbNoun,
    /// A single word with no separator, which no `verb noun` pair can match.
    SingleWord,
}

/// Derives the dispatch key for a handler type name.
///
/// An underscore is inserted before every uppercase letter, the result is
/// lower-cased, and leading underscores are stripped: `CreateFoo` becomes
/// `create_foo`.
#[must_use]
pub fn derive_key(type_name: &str) -> String {
    let mut key = String::with_capacity(type_name.len() + 2);
    for ch in type_name.chars() {
        if ch.is_uppercase() {
            key.push('_');
        }
        key.extend(ch.to_lowercase());
    }
    key.trim_start_matches('_').to_owned()
}

/// Checks that a derived key encodes at most two words.
///
/// Keys without any separator are accepted and reported as
/// [`KeyShape::SingleWord`] so discovery can warn about them.
///
/// # Errors
///
/// Returns [`RegistryError::InvalidHandlerName`] when the key holds more than
/// one underscore.
pub fn validate_key(type_name: &str, key: &str) -> Result<KeyShape, RegistryError> {
    match key.matches('_').count() {
        0 => Ok(KeyShape::SingleWord),
        1 => Ok(KeyShape::VerbNoun),
        _ => Err(RegistryError::InvalidHandlerName {
            type_name: type_name.to_owned(),
            key: key.to_owned(),
        }),
    }
}

/// Strips module paths and generic arguments from a Rust type name.
///
/// `my_app::handlers::NewFile<T>` becomes `NewFile`.
#[must_use]
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
