//! Loading of `KEY=value` environment files.

use std::env;
use std::fs;
use std::io;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};

use crate::ConfigError;

/// Parsed contents of an environment file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    path: Utf8PathBuf,
    entries: Vec<(String, String)>,
}

impl EnvFile {
    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFileNotFound`] when the file is missing,
    /// [`ConfigError::EnvFileRead`] when it cannot be read, and
    /// [`ConfigError::EnvFileSyntax`] for malformed lines.
    pub fn read(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|error| {
            if error.kind() == io::ErrorKind::NotFound {
                ConfigError::EnvFileNotFound {
                    path: path.to_owned(),
                }
            } else {
                ConfigError::EnvFileRead {
                    path: path.to_owned(),
                    source: Arc::new(error),
                }
            }
        })?;
        Self::parse(path, &text)
    }

    /// Parses environment file text.
    ///
    /// Blank lines and `#` comments are skipped, a leading `export ` is
    /// ignored, and matching single or double quotes around a value are
    /// stripped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFileSyntax`] for a line without `=` or with
    /// an empty key.
    pub fn parse(path: &Utf8Path, text: &str) -> Result<Self, ConfigError> {
        let mut entries = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let line = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let syntax_error = || ConfigError::EnvFileSyntax {
                path: path.to_owned(),
                line: index + 1,
            };
            let (key, value) = line.split_once('=').ok_or_else(syntax_error)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(syntax_error());
            }
            entries.push((key.to_owned(), unquote(value.trim()).to_owned()));
        }
        Ok(Self {
            path: path.to_owned(),
            entries,
        })
    }

    /// Path the entries were read from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Parsed entries in file order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Applies the entries to the process environment.
    ///
    /// Variables that are already set keep their current value. Returns the
    /// number of variables written.
    ///
    /// Must run before the process starts additional threads.
    #[must_use = "the count reports how many variables were applied"]
    pub fn apply(&self) -> usize {
        let mut applied = 0;
        for (key, value) in &self.entries {
            if env::var_os(key).is_some() {
                continue;
            }
            // Environment mutation is unsafe in edition 2024; dispatch is
            // single-threaded until a handler runs.
            unsafe { env::set_var(key, value) };
            applied += 1;
        }
        applied
    }
}

fn unquote(value: &str) -> &str {
    ['"', '\'']
        .iter()
        .find_map(|quote| {
            value
                .strip_prefix(*quote)
                .and_then(|rest| rest.strip_suffix(*quote))
        })
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(text: &str) -> Result<EnvFile, ConfigError> {
        EnvFile::parse(Utf8Path::new(".env"), text)
    }

    #[test]
    fn parses_plain_lines() {
        let file = parse("DATABASE_URL=postgres://db\n\nIAM_ROLE=admin\n").expect("parse");
        assert_eq!(
            file.entries(),
            &[
                ("DATABASE_URL".to_owned(), "postgres://db".to_owned()),
                ("IAM_ROLE".to_owned(), "admin".to_owned()),
            ]
        );
    }

    #[rstest]
    #[case::double("KEY=\"quoted value\"", "quoted value")]
    #[case::single("KEY='quoted value'", "quoted value")]
    #[case::export("export KEY=value", "value")]
    #[case::spaced("KEY = value ", "value")]
    #[case::equals_in_value("KEY=a=b", "a=b")]
    #[case::mismatched("KEY=\"half", "\"half")]
    fn value_forms(#[case] line: &str, #[case] expected: &str) {
        let file = parse(line).expect("parse");
        let (_, value) = file.entries().first().expect("one entry");
        assert_eq!(value, expected);
    }

    #[test]
    fn skips_comments() {
        let file = parse("# comment\nKEY=value\n   # indented comment\n").expect("parse");
        assert_eq!(file.entries().len(), 1);
    }

    #[rstest]
    #[case::no_equals("JUSTAKEY", 1)]
    #[case::empty_key("KEY=ok\n=value", 2)]
    fn rejects_malformed_lines(#[case] text: &str, #[case] expected_line: usize) {
        let err = parse(text).expect_err("malformed");
        match err {
            ConfigError::EnvFileSyntax { line, .. } => assert_eq!(line, expected_line),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.env")).expect("utf8 path");
        let err = EnvFile::read(&path).expect_err("missing file");
        assert!(matches!(err, ConfigError::EnvFileNotFound { .. }));
        assert!(err.to_string().contains("absent.env"));
    }
}
