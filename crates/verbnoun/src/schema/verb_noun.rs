//! Phase one: the leading `verb noun` pair.

use clap::builder::PossibleValuesParser;
use clap::{Arg, Command};

use super::{ArgumentError, TokenRole};

/// The vocabulary tokens selected by phase one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbNoun {
    /// First token.
    pub verb: String,
    /// Second token.
    pub noun: String,
}

impl VerbNoun {
    /// Dispatch key for the pair.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}_{}", self.verb, self.noun)
    }
}

/// Parses exactly the first two tokens against the vocabulary.
///
/// Returns the pair and the untouched remaining tokens.
///
/// # Errors
///
/// Returns [`ArgumentError::MissingArgument`] when fewer than two tokens are
/// given or a flag stands where the verb or noun belongs,
/// [`ArgumentError::UnknownVerbOrNoun`] for a token outside the
/// vocabulary, and [`ArgumentError::Help`] for `--help`.
pub fn parse_verb_noun<'a>(
    app_name: &str,
    verbs: &[String],
    nouns: &[String],
    tokens: &'a [String],
) -> Result<(VerbNoun, &'a [String]), ArgumentError> {
    let (head, rest) = tokens.split_at(tokens.len().min(2));
    match head {
        [verb, noun] => {
            check_member(TokenRole::Verb, verb, verbs)?;
            check_member(TokenRole::Noun, noun, nouns)?;
        }
        [verb] => check_member(TokenRole::Verb, verb, verbs)?,
        _ => {}
    }
    let matches = vocabulary_command(app_name, verbs, nouns)
        .try_get_matches_from(head)
        .map_err(|error| ArgumentError::from_clap(&error))?;
    let pair = VerbNoun {
        verb: vocabulary_value(&matches, "verb"),
        noun: vocabulary_value(&matches, "noun"),
    };
    Ok((pair, rest))
}

/// Builds the phase-one command used for parsing and usage text.
#[must_use]
pub fn vocabulary_command(app_name: &str, verbs: &[String], nouns: &[String]) -> Command {
    Command::new(app_name.to_owned())
        .no_binary_name(true)
        .arg(
            Arg::new("verb")
                .value_name("VERB")
                .required(true)
                .value_parser(PossibleValuesParser::new(verbs.iter().cloned())),
        )
        .arg(
            Arg::new("noun")
                .value_name("NOUN")
                .required(true)
                .value_parser(PossibleValuesParser::new(nouns.iter().cloned())),
        )
}

fn vocabulary_value(matches: &clap::ArgMatches, id: &str) -> String {
    matches
        .try_get_one::<String>(id)
        .ok()
        .flatten()
        .cloned()
        .unwrap_or_default()
}

/// Help requests pass phase one untouched so `clap` can render usage.
const HELP_TOKENS: [&str; 2] = ["-h", "--help"];

fn check_member(role: TokenRole, token: &str, vocabulary: &[String]) -> Result<(), ArgumentError> {
    if HELP_TOKENS.contains(&token) || vocabulary.iter().any(|word| word == token) {
        return Ok(());
    }
    if token.starts_with('-') {
        return Err(ArgumentError::MissingArgument {
            message: format!("expected a {role} before '{token}'"),
        });
    }
    Err(ArgumentError::UnknownVerbOrNoun {
        role,
        token: token.to_owned(),
        expected: vocabulary.to_vec(),
    })
}
