//! Crate-level fixtures and BDD tests.

use std::sync::Arc;

use verbnoun_config::Config;

use crate::catalog::Catalog;

pub(crate) mod handlers;


use self::handlers::{ListConfigs, ListFile, NewConfigs, NewFile};

pub(crate) const SPAM_YAML: &str = "\
app:
  name: spam
entrypoints:
  - spam/terminal
terminal:
  verbs: [new, list]
  nouns: [file, configs]
";

pub(crate) fn spam_config() -> Arc<Config> {
    Arc::new(Config::from_yaml_str(SPAM_YAML).expect("valid config"))
}

pub(crate) fn spam_catalog() -> Catalog {
    Catalog::new()
        .register::<NewFile>("spam/terminal")
        .register::<ListConfigs>("spam/terminal")
        .register::<ListFile>("spam/terminal/files")
        .register::<NewConfigs>("spam/terminal/files")
}

pub(crate) fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|token| (*token).to_owned()).collect()
}
