//! Resolution of logical resource names to concrete values.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::ConfigError;

/// Resource sections that map logical names to values.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    /// `db_connections`.
    DbConnection,
    /// `iam_roles`.
    IamRole,
    /// `s3_buckets`.
    #[strum(serialize = "s3_bucket")]
    S3Bucket,
    /// `aws_secrets`.
    AwsSecret,
}

/// Returns true when `value` has the shape of an environment variable name.
///
/// Such values are looked up in the environment; anything else is used as a
/// literal.
#[must_use]
pub fn looks_like_env_var(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_uppercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

pub(crate) fn resolve<F>(name: &str, value: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !looks_like_env_var(value) {
        return Ok(value.to_owned());
    }
    lookup(value).ok_or_else(|| ConfigError::MissingConnection {
        name: name.to_owned(),
        reason: format!("environment variable {value} is not set"),
    })
}
