use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Configuration file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "verbnoun.yml";

/// Environment file loaded when `environment.app_env` is not set.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

pub(crate) fn default_env_file() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_ENV_FILE)
}
