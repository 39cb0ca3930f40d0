//! Configuration model for verbnoun applications.
//!
//! A verbnoun application is described by a single YAML document naming the
//! application, the module paths searched for command handlers, and the verb
//! and noun vocabulary accepted on the command line. Optional sections map
//! logical resource names (database connections, IAM roles, buckets, secrets)
//! to environment variables or literal values, and declare whether an
//! environment file should be loaded before any handler runs.
//!
//! The model is loaded once per process and never mutated afterwards. Callers
//! share it by reference or behind an `Arc`.

mod defaults;
mod env_file;
mod error;
mod logging;
mod resources;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use defaults::{
    DEFAULT_CONFIG_FILE, DEFAULT_ENV_FILE, DEFAULT_LOG_FILTER, default_log_format,
};
pub use env_file::EnvFile;
pub use error::ConfigError;
pub use logging::{LogFormat, LogFormatParseError, LogSettings};
pub use resources::{ResourceKind, looks_like_env_var};

/// Tracing target for configuration events.
const CONFIG_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::config");

/// Mapping from a logical resource name to an environment variable or literal.
pub type ResourceMap = BTreeMap<String, String>;

/// Application identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSection {
    /// Application name.
    pub name: String,
    /// Free-form description shown in help output.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// The verb and noun vocabulary accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalSection {
    /// Accepted first tokens.
    pub verbs: Vec<String>,
    /// Accepted second tokens.
    pub nouns: Vec<String>,
}

/// Environment file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentSection {
    /// Loads [`EnvironmentSection::app_env`] before dispatch when true.
    #[serde(default)]
    pub load_env: bool,
    /// Environment file name, relative to the working directory.
    #[serde(default = "defaults::default_env_file")]
    pub app_env: Utf8PathBuf,
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        Self {
            load_env: false,
            app_env: defaults::default_env_file(),
        }
    }
}

impl EnvironmentSection {
    fn is_default(&self) -> bool {
        self == &Self::default()
    }
}

/// Loaded configuration document.
///
/// # Example
///
/// ```yaml
/// app:
///   name: spam
/// entrypoints:
///   - spam/terminal
/// terminal:
///   verbs: [new, list]
///   nouns: [file, configs]
/// db_connections:
///   redshift: DATABASE_URL
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    app: AppSection,
    entrypoints: Vec<String>,
    terminal: TerminalSection,
    #[serde(default, skip_serializing_if = "EnvironmentSection::is_default")]
    environment: EnvironmentSection,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    db_connections: ResourceMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    iam_roles: ResourceMap,
    #[serde(default, alias = "aws_buckets", skip_serializing_if = "BTreeMap::is_empty")]
    s3_buckets: ResourceMap,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    aws_secrets: ResourceMap,
}

impl Config {
    /// Creates a configuration with the required sections and no resources.
    #[must_use]
    pub fn new(app: AppSection, entrypoints: Vec<String>, terminal: TerminalSection) -> Self {
        Self {
            app,
            entrypoints,
            terminal,
            environment: EnvironmentSection::default(),
            db_connections: ResourceMap::new(),
            iam_roles: ResourceMap::new(),
            s3_buckets: ResourceMap::new(),
            aws_secrets: ResourceMap::new(),
        }
    }

    /// Replaces the environment section.
    #[must_use]
    pub fn with_environment(mut self, environment: EnvironmentSection) -> Self {
        self.environment = environment;
        self
    }

    /// Adds a resource mapping of the given kind.
    #[must_use]
    pub fn with_resource(
        mut self,
        kind: ResourceKind,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.resources_mut(kind).insert(name.into(), value.into());
        self
    }

    /// Loads and validates the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] when the file does not exist,
    /// [`ConfigError::Read`] when it cannot be read, and
    /// [`ConfigError::Malformed`] when a required section is missing or has
    /// the wrong shape.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: path.to_owned(),
                });
            }
            Err(error) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source: Arc::new(error),
                });
            }
        };
        let config = Self::parse(path.as_str(), &text)?;
        debug!(
            target: CONFIG_TARGET,
            path = %path,
            app = config.app_name(),
            entrypoints = config.entrypoints.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Parses a YAML document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] when the document does not match the
    /// expected shape.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Self::parse("<inline>", text)
    }

    fn parse(origin: &str, text: &str) -> Result<Self, ConfigError> {
        serde_saphyr::from_str(text).map_err(|error| ConfigError::Malformed {
            origin: origin.to_owned(),
            message: error.to_string(),
        })
    }

    /// Serialises the model back to YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialise`] if the emitter rejects the model.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|error| ConfigError::Serialise {
            message: error.to_string(),
        })
    }

    /// Fails unless both halves of the vocabulary are populated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] naming the empty list.
    pub fn validate_vocabulary(&self) -> Result<(), ConfigError> {
        let empty = if self.terminal.verbs.is_empty() {
            Some("terminal.verbs")
        } else if self.terminal.nouns.is_empty() {
            Some("terminal.nouns")
        } else {
            None
        };
        match empty {
            Some(section) => Err(ConfigError::Malformed {
                origin: self.app_name().to_owned(),
                message: format!("{section} must list at least one entry"),
            }),
            None => Ok(()),
        }
    }

    /// Application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app.name
    }

    /// Application description, empty when not configured.
    #[must_use]
    pub fn app_description(&self) -> &str {
        &self.app.description
    }

    /// Handler search paths in declaration order.
    #[must_use]
    pub fn entrypoints(&self) -> &[String] {
        &self.entrypoints
    }

    /// Accepted verbs in declaration order.
    #[must_use]
    pub fn verbs(&self) -> &[String] {
        &self.terminal.verbs
    }

    /// Accepted nouns in declaration order.
    #[must_use]
    pub fn nouns(&self) -> &[String] {
        &self.terminal.nouns
    }

    /// Every `verb_noun` combination the vocabulary admits.
    #[must_use]
    pub fn verb_noun_map(&self) -> Vec<String> {
        self.verbs()
            .iter()
            .flat_map(|verb| self.nouns().iter().map(move |noun| format!("{verb}_{noun}")))
            .collect()
    }

    /// Environment file settings.
    #[must_use]
    pub const fn environment(&self) -> &EnvironmentSection {
        &self.environment
    }

    /// True when the environment file must be loaded before dispatch.
    #[must_use]
    pub const fn load_env(&self) -> bool {
        self.environment.load_env
    }

    /// Environment file name.
    #[must_use]
    pub fn env_file_name(&self) -> &Utf8Path {
        &self.environment.app_env
    }

    /// Loads the declared environment file into the process environment.
    ///
    /// Returns the number of variables applied, or `None` when the
    /// configuration does not ask for an environment file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFileNotFound`] when the declared file is
    /// missing and [`ConfigError::EnvFileSyntax`] for malformed lines.
    pub fn load_environment(&self) -> Result<Option<usize>, ConfigError> {
        if !self.load_env() {
            return Ok(None);
        }
        let applied = EnvFile::read(self.env_file_name())?.apply();
        debug!(
            target: CONFIG_TARGET,
            path = %self.env_file_name(),
            applied,
            "environment file loaded"
        );
        Ok(Some(applied))
    }

    /// Raw mapping for a resource kind.
    #[must_use]
    pub const fn resources(&self, kind: ResourceKind) -> &ResourceMap {
        match kind {
            ResourceKind::DbConnection => &self.db_connections,
            ResourceKind::IamRole => &self.iam_roles,
            ResourceKind::S3Bucket => &self.s3_buckets,
            ResourceKind::AwsSecret => &self.aws_secrets,
        }
    }

    fn resources_mut(&mut self, kind: ResourceKind) -> &mut ResourceMap {
        match kind {
            ResourceKind::DbConnection => &mut self.db_connections,
            ResourceKind::IamRole => &mut self.iam_roles,
            ResourceKind::S3Bucket => &mut self.s3_buckets,
            ResourceKind::AwsSecret => &mut self.aws_secrets,
        }
    }

    /// Resolves a named resource against the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingConnection`] when the name is not
    /// configured or refers to an unset environment variable.
    pub fn resource(&self, kind: ResourceKind, name: &str) -> Result<String, ConfigError> {
        self.resource_with(kind, name, |key| std::env::var(key).ok())
    }

    /// Resolves a named resource using a caller-supplied variable lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::resource`].
    pub fn resource_with<F>(
        &self,
        kind: ResourceKind,
        name: &str,
        lookup: F,
    ) -> Result<String, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = self
            .resources(kind)
            .get(name)
            .ok_or_else(|| ConfigError::MissingConnection {
                name: name.to_owned(),
                reason: format!("no {kind} named '{name}' is configured"),
            })?;
        resources::resolve(name, value, lookup)
    }

    /// Database connection string for `name`.
    ///
    /// # Errors
    ///
    /// See [`Config::resource`].
    pub fn connection_string(&self, name: &str) -> Result<String, ConfigError> {
        self.resource(ResourceKind::DbConnection, name)
    }

    /// IAM role for `name`.
    ///
    /// # Errors
    ///
    /// See [`Config::resource`].
    pub fn iam_role(&self, name: &str) -> Result<String, ConfigError> {
        self.resource(ResourceKind::IamRole, name)
    }

    /// Bucket name for `name`.
    ///
    /// # Errors
    ///
    /// See [`Config::resource`].
    pub fn s3_bucket(&self, name: &str) -> Result<String, ConfigError> {
        self.resource(ResourceKind::S3Bucket, name)
    }

    /// Secret value for `name`.
    ///
    /// # Errors
    ///
    /// See [`Config::resource`].
    pub fn aws_secret(&self, name: &str) -> Result<String, ConfigError> {
        self.resource(ResourceKind::AwsSecret, name)
    }
}
