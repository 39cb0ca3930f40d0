//! `list commands`: the commands this invocation can dispatch.

use std::io::Write;
use std::sync::Arc;

use verbnoun::registry::unmatched_commands;
use verbnoun::{ArgumentSchema, ArgumentSpec, EntryPoint, Handler, HandlerContext};
use verbnoun_config::Config;

use super::command_line;

/// Prints every indexed command the vocabulary can reach, optionally followed
/// by vocabulary pairs that no handler answers.
#[derive(Debug)]
pub struct ListCommands {
    config: Arc<Config>,
    registered: Arc<[String]>,
    unmatched: bool,
}

impl Handler for ListCommands {
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        let vocabulary = self.config.verb_noun_map();
        for key in self.registered.iter().filter(|key| vocabulary.contains(key)) {
            writeln!(out, "{}", command_line(key))?;
        }
        if !self.unmatched {
            return Ok(());
        }
        let missing = unmatched_commands(&self.config, |key| {
            self.registered.iter().any(|registered| registered == key)
        });
        if missing.is_empty() {
            return Ok(());
        }
        writeln!(out, "\nnot implemented:")?;
        for key in &missing {
            writeln!(out, "  {}", command_line(key))?;
        }
        Ok(())
    }
}

impl EntryPoint for ListCommands {
    fn schema() -> ArgumentSchema {
        ArgumentSchema::new().with(
            ArgumentSpec::flag("unmatched")
                .short('u')
                .switch()
                .help("Also list vocabulary pairs with no handler"),
        )
    }

    fn new(context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self {
            unmatched: context.arguments.switch("unmatched"),
            config: context.config,
            registered: context.registered,
        })
    }
}
