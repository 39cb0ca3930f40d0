//! `list configs`: the loaded configuration document.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use verbnoun::{ArgumentSchema, ArgumentSpec, EntryPoint, Handler, HandlerContext};
use verbnoun_config::Config;

/// Output format for [`ListConfigs`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML, the format the document is written in.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json,
}

impl ConfigFormat {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "yaml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("unsupported format '{other}' (expected yaml or json)"),
        }
    }
}

/// Prints the configuration as loaded, after defaults are applied.
#[derive(Debug)]
pub struct ListConfigs {
    config: Arc<Config>,
    format: ConfigFormat,
}

impl Handler for ListConfigs {
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        let rendered = match self.format {
            ConfigFormat::Yaml => self.config.to_yaml_string()?,
            ConfigFormat::Json => {
                let mut json = serde_json::to_string_pretty(self.config.as_ref())
                    .context("failed to render configuration as JSON")?;
                json.push('\n');
                json
            }
        };
        out.write_all(rendered.as_bytes())?;
        Ok(())
    }
}

impl EntryPoint for ListConfigs {
    fn schema() -> ArgumentSchema {
        ArgumentSchema::new().with(
            ArgumentSpec::flag("format")
                .short('f')
                .default_value("yaml")
                .help("Output format: yaml or json"),
        )
    }

    fn new(context: HandlerContext) -> anyhow::Result<Self> {
        let format = context
            .arguments
            .text("format")
            .map_or(Ok(ConfigFormat::default()), ConfigFormat::parse)?;
        Ok(Self {
            config: context.config,
            format,
        })
    }
}
