//! `show connection NAME`: resolves a configured resource.

use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use verbnoun::{ArgumentSchema, ArgumentSpec, EntryPoint, Handler, HandlerContext};
use verbnoun_config::{Config, ResourceKind};

/// Resolves a logical resource name against the environment and prints the
/// value.
#[derive(Debug)]
pub struct ShowConnection {
    config: Arc<Config>,
    name: String,
    kind: ResourceKind,
}

impl Handler for ShowConnection {
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        let value = self.config.resource(self.kind, &self.name)?;
        writeln!(out, "{value}")?;
        Ok(())
    }
}

impl EntryPoint for ShowConnection {
    fn schema() -> ArgumentSchema {
        ArgumentSchema::new()
            .with(
                ArgumentSpec::positional("name")
                    .required()
                    .help("Logical resource name"),
            )
            .with(
                ArgumentSpec::flag("kind")
                    .short('k')
                    .default_value("db_connection")
                    .help("db_connection, iam_role, s3_bucket or aws_secret"),
            )
    }

    fn new(context: HandlerContext) -> anyhow::Result<Self> {
        let name = context
            .arguments
            .text("name")
            .context("a resource name is required")?
            .to_owned();
        let kind = context
            .arguments
            .text("kind")
            .unwrap_or("db_connection")
            .parse::<ResourceKind>()
            .context("unknown resource kind")?;
        Ok(Self {
            config: context.config,
            name,
            kind,
        })
    }
}
