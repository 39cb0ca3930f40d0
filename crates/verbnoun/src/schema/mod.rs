//! Declarative argument schemas and the two parsing phases.
//!
//! Parsing happens in two passes over the command line. Phase one consumes
//! the leading `verb noun` tokens against the configured vocabulary (see
//! [`parse_verb_noun`]). Phase two consumes whatever remains against the
//! schema of the handler phase one selected (see [`ArgumentSchema::parse`]).
//! Each phase builds its own `clap` command; the second schema is unknown
//! until the first phase has finished.

mod error;
mod values;
mod verb_noun;

use std::collections::BTreeSet;

use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};

pub use self::error::{ArgumentError, TokenRole};
pub use self::values::{ArgValue, ParsedArguments};
pub use self::verb_noun::{VerbNoun, parse_verb_noun, vocabulary_command};

/// Argument id of the generated help switch.
const HELP_ID: &str = "help";
const HELP_LONG: &str = "help";
const HELP_SHORT: char = 'h';

/// Value type of a declared argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArgKind {
    /// Free text.
    #[default]
    Text,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Presence flag taking no value.
    Switch,
}

/// Declaration of a single flag or positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    name: String,
    long: Option<String>,
    short: Option<char>,
    help: String,
    default: Option<String>,
    required: bool,
    kind: ArgKind,
    multiple: bool,
}

impl ArgumentSpec {
    /// Declares `--name`.
    #[must_use]
    pub fn flag(name: impl Into<String>) -> Self {
        let owned = name.into();
        Self {
            long: Some(owned.clone()),
            ..Self::positional(owned)
        }
    }

    /// Declares a positional argument.
    #[must_use]
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            long: None,
            short: None,
            help: String::new(),
            default: None,
            required: false,
            kind: ArgKind::Text,
            multiple: false,
        }
    }

    /// Adds a single-character alias.
    #[must_use]
    pub const fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Overrides the long flag spelling.
    #[must_use]
    pub fn long(mut self, long: impl Into<String>) -> Self {
        self.long = Some(long.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    /// Sets the value used when the argument is omitted.
    #[must_use]
    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Marks the argument as mandatory.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the value type.
    #[must_use]
    pub const fn kind(mut self, kind: ArgKind) -> Self {
        self.kind = kind;
        self
    }

    /// Shorthand for `kind(ArgKind::Switch)`.
    #[must_use]
    pub const fn switch(self) -> Self {
        self.kind(ArgKind::Switch)
    }

    /// Accepts the argument more than once.
    #[must_use]
    pub const fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Argument name used as the key in [`ParsedArguments`].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help text.
    #[must_use]
    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// True when neither a long nor a short flag is declared.
    #[must_use]
    pub const fn is_positional(&self) -> bool {
        self.long.is_none() && self.short.is_none()
    }

    fn to_arg(&self) -> Arg {
        let mut arg = Arg::new(self.name.clone()).help(self.help.clone());
        if let Some(long) = &self.long {
            arg = arg.long(long.clone());
        }
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        arg = match self.kind {
            ArgKind::Switch => arg.action(ArgAction::SetTrue),
            ArgKind::Text => self.with_value(arg.value_parser(value_parser!(String))),
            ArgKind::Integer => self.with_value(arg.value_parser(value_parser!(i64))),
            ArgKind::Float => self.with_value(arg.value_parser(value_parser!(f64))),
        };
        arg.required(self.required)
    }

    fn with_value(&self, base: Arg) -> Arg {
        let mut arg = if self.multiple {
            let appended = base.action(ArgAction::Append);
            if self.is_positional() {
                appended.num_args(1..)
            } else {
                appended
            }
        } else {
            base.action(ArgAction::Set)
        };
        if let Some(default) = &self.default {
            arg = arg.default_value(default.clone());
        }
        arg
    }

    fn extract(&self, matches: &ArgMatches) -> Result<Option<ArgValue>, ArgumentError> {
        let id = self.name.as_str();
        let value = match (self.kind, self.multiple) {
            (ArgKind::Switch, _) => {
                Some(ArgValue::Switch(read_one::<bool>(matches, id)?.unwrap_or(false)))
            }
            (ArgKind::Text, false) => read_one::<String>(matches, id)?.map(ArgValue::Text),
            (ArgKind::Integer, false) => read_one::<i64>(matches, id)?.map(ArgValue::Integer),
            (ArgKind::Float, false) => read_one::<f64>(matches, id)?.map(ArgValue::Float),
            (ArgKind::Text, true) => read_many::<String>(matches, id, ArgValue::Text)?,
            (ArgKind::Integer, true) => read_many::<i64>(matches, id, ArgValue::Integer)?,
            (ArgKind::Float, true) => read_many::<f64>(matches, id, ArgValue::Float)?,
        };
        Ok(value)
    }
}

fn read_one<T>(matches: &ArgMatches, id: &str) -> Result<Option<T>, ArgumentError>
where
    T: Clone + Send + Sync + 'static,
{
    matches
        .try_get_one::<T>(id)
        .map(Option::<&T>::cloned)
        .map_err(|error| ArgumentError::InvalidValue {
            message: format!("{id}: {error}"),
        })
}

fn read_many<T>(
    matches: &ArgMatches,
    id: &str,
    wrap: fn(T) -> ArgValue,
) -> Result<Option<ArgValue>, ArgumentError>
where
    T: Clone + Send + Sync + 'static,
{
    let values = matches
        .try_get_many::<T>(id)
        .map_err(|error| ArgumentError::InvalidValue {
            message: format!("{id}: {error}"),
        })?;
    Ok(values.map(|found| ArgValue::List(found.cloned().map(wrap).collect())))
}

/// The flags and positionals a handler accepts after its `verb noun` pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentSchema {
    specs: Vec<ArgumentSpec>,
}

impl ArgumentSchema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an argument declaration.
    #[must_use]
    pub fn with(mut self, spec: ArgumentSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Declared arguments in declaration order.
    #[must_use]
    pub fn specs(&self) -> &[ArgumentSpec] {
        &self.specs
    }

    /// True when the handler takes no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Checks that the declarations describe a parseable command line.
    ///
    /// Names, long flags and short flags must be unique, and `help` is
    /// reserved as a name. Switches must be flags without a default and
    /// cannot repeat. Required positionals cannot follow optional ones, and
    /// nothing may follow a repeated positional.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidSchema`] naming the first offending
    /// declaration.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        let mut check = SchemaCheck::default();
        for spec in &self.specs {
            check.spellings(spec)?;
            check.shape(spec)?;
        }
        Ok(())
    }

    /// Builds the `clap` command for this schema.
    ///
    /// `--help` and `-h` are added for whichever spelling the schema leaves
    /// free.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidSchema`] when [`Self::validate`]
    /// rejects the declarations.
    pub fn command(&self, name: &str) -> Result<Command, ArgumentError> {
        self.validate()?;
        let mut command = Command::new(name.to_owned())
            .no_binary_name(true)
            .disable_help_flag(true)
            .args(self.specs.iter().map(ArgumentSpec::to_arg));
        if let Some(help) = self.help_arg() {
            command = command.arg(help);
        }
        Ok(command)
    }

    fn help_arg(&self) -> Option<Arg> {
        let long_free = self
            .specs
            .iter()
            .all(|spec| spec.long.as_deref() != Some(HELP_LONG));
        let short_free = self
            .specs
            .iter()
            .all(|spec| spec.short != Some(HELP_SHORT));
        if !long_free && !short_free {
            return None;
        }
        let mut help = Arg::new(HELP_ID).action(ArgAction::Help).help("Print help");
        if long_free {
            help = help.long(HELP_LONG);
        }
        if short_free {
            help = help.short(HELP_SHORT);
        }
        Some(help)
    }

    /// Phase two: parses the tokens left after the `verb noun` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError::InvalidSchema`] when the declarations are
    /// inconsistent, [`ArgumentError::UnrecognizedArgument`] for undeclared
    /// tokens, [`ArgumentError::MissingArgument`] when a required argument is
    /// absent, [`ArgumentError::InvalidValue`] when a value does not convert
    /// to its declared kind, and [`ArgumentError::Help`] for `--help`.
    pub fn parse(&self, name: &str, tokens: &[String]) -> Result<ParsedArguments, ArgumentError> {
        let matches = self
            .command(name)?
            .try_get_matches_from(tokens)
            .map_err(|error| ArgumentError::from_clap(&error))?;
        let mut parsed = ParsedArguments::new();
        for spec in &self.specs {
            if let Some(value) = spec.extract(&matches)? {
                parsed.insert(spec.name(), value);
            }
        }
        Ok(parsed)
    }
}

/// Declarations seen so far while validating a schema.
#[derive(Default)]
struct SchemaCheck<'a> {
    names: BTreeSet<&'a str>,
    longs: BTreeSet<&'a str>,
    shorts: BTreeSet<char>,
    optional_positional: Option<&'a str>,
    repeated_positional: Option<&'a str>,
}

impl<'a> SchemaCheck<'a> {
    fn spellings(&mut self, spec: &'a ArgumentSpec) -> Result<(), ArgumentError> {
        let name = spec.name.as_str();
        if name == HELP_ID {
            return Err(invalid_schema(format!(
                "argument name '{HELP_ID}' is reserved"
            )));
        }
        if !self.names.insert(name) {
            return Err(invalid_schema(format!(
                "argument '{name}' is declared twice"
            )));
        }
        if let Some(long) = spec.long.as_deref() {
            if long.is_empty() || long.starts_with('-') {
                return Err(invalid_schema(format!(
                    "argument '{name}' has an invalid long flag '{long}'"
                )));
            }
            if !self.longs.insert(long) {
                return Err(invalid_schema(format!(
                    "flag '--{long}' is declared twice"
                )));
            }
        }
        if let Some(short) = spec.short {
            if short == '-' {
                return Err(invalid_schema(format!(
                    "argument '{name}' cannot use '-' as a short flag"
                )));
            }
            if !self.shorts.insert(short) {
                return Err(invalid_schema(format!(
                    "flag '-{short}' is declared twice"
                )));
            }
        }
        Ok(())
    }

    fn shape(&mut self, spec: &'a ArgumentSpec) -> Result<(), ArgumentError> {
        let name = spec.name.as_str();
        if spec.kind == ArgKind::Switch
            && (spec.multiple || spec.default.is_some() || spec.is_positional())
        {
            return Err(invalid_schema(format!(
                "switch '{name}' must be a single flag without a default"
            )));
        }
        if !spec.is_positional() {
            return Ok(());
        }
        if let Some(repeated) = self.repeated_positional {
            return Err(invalid_schema(format!(
                "positional '{name}' follows repeated positional '{repeated}'"
            )));
        }
        match (spec.required, self.optional_positional) {
            (true, Some(optional)) => {
                return Err(invalid_schema(format!(
                    "required positional '{name}' follows optional positional '{optional}'"
                )));
            }
            (false, None) => self.optional_positional = Some(name),
            _ => {}
        }
        if spec.multiple {
            self.repeated_positional = Some(name);
        }
        Ok(())
    }
}

fn invalid_schema(message: String) -> ArgumentError {
    ArgumentError::InvalidSchema { message }
}
