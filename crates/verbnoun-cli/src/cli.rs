//! Program-level flags accepted before the `verb noun` pair.

use camino::Utf8PathBuf;
use clap::Parser;
use verbnoun_config::{DEFAULT_CONFIG_FILE, DEFAULT_LOG_FILTER, LogFormat};

/// Flags that configure the runner rather than the dispatched command.
#[derive(Parser, Debug, Clone)]
#[command(name = "verbnoun", disable_help_flag = true, disable_version_flag = true)]
pub(crate) struct Cli {
    /// Configuration document describing the application.
    #[arg(long, env = "VERBNOUN_CONFIG_PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub(crate) config_path: Utf8PathBuf,
    /// Tracing filter directives.
    #[arg(long, env = "VERBNOUN_LOG_FILTER", default_value = DEFAULT_LOG_FILTER)]
    pub(crate) log_filter: String,
    /// Diagnostic log rendering.
    #[arg(long, env = "VERBNOUN_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
}
