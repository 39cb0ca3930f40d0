//! Handlers used across the crate's tests.

use std::io::Write;

use anyhow::bail;

use crate::handler::{EntryPoint, Handler, HandlerContext};
use crate::schema::{ArgumentSchema, ArgumentSpec};

/// Echoes its parsed arguments, one `name=value` line each.
pub(crate) struct NewFile {
    context: HandlerContext,
}

impl Handler for NewFile {
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        for (name, value) in self.context.arguments.iter() {
            writeln!(out, "{name}={value}")?;
        }
        Ok(())
    }
}

impl EntryPoint for NewFile {
    fn schema() -> ArgumentSchema {
        ArgumentSchema::new().with(ArgumentSpec::flag("foo").help("value to echo"))
    }

    fn new(context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self { context })
    }
}

/// Prints the application name.
pub(crate) struct ListConfigs {
    app: String,
}

impl Handler for ListConfigs {
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "{}", self.app)?;
        Ok(())
    }
}

impl EntryPoint for ListConfigs {
    fn new(context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self {
            app: context.config.app_name().to_owned(),
        })
    }
}

/// Fails when run.
pub(crate) struct ListFile;

impl Handler for ListFile {
    fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
        bail!("disk on fire")
    }
}

impl EntryPoint for ListFile {
    fn new(_context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

/// Fails during construction.
pub(crate) struct NewConfigs;

impl Handler for NewConfigs {
    fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl EntryPoint for NewConfigs {
    fn new(_context: HandlerContext) -> anyhow::Result<Self> {
        bail!("cannot construct")
    }
}

/// Two-word name outside the test vocabulary.
pub(crate) struct CreateFoo;

impl Handler for CreateFoo {
    fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl EntryPoint for CreateFoo {
    fn new(_context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

/// Three-word name.
pub(crate) struct CreateFooBar;

impl Handler for CreateFooBar {
    fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
        Ok(())
    }
}

impl EntryPoint for CreateFooBar {
    fn new(_context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

/// Single-word name.
pub(crate) struct Greet;

impl Handler for Greet {
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "hello")?;
        Ok(())
    }
}

impl EntryPoint for Greet {
    fn new(_context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

/// A type sharing the contract's name.
pub(crate) mod contract {
    use std::io::Write;

    use crate::handler::{EntryPoint, HandlerContext};

    pub(crate) struct Handler;

    impl crate::handler::Handler for Handler {
        fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
            Ok(())
        }
    }

    impl EntryPoint for Handler {
        fn new(_context: HandlerContext) -> anyhow::Result<Self> {
            Ok(Self)
        }
    }
}

/// A second `NewFile` living in another module.
pub(crate) mod shadow {
    use std::io::Write;

    use crate::handler::{EntryPoint, Handler, HandlerContext};

    pub(crate) struct NewFile;

    impl Handler for NewFile {
        fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
            Ok(())
        }
    }

    impl EntryPoint for NewFile {
        fn new(_context: HandlerContext) -> anyhow::Result<Self> {
            Ok(Self)
        }
    }
}

/// A `NewFile` whose schema must never be consulted.
pub(crate) mod schema_trap {
    use std::io::Write;

    use crate::handler::{EntryPoint, Handler, HandlerContext};
    use crate::schema::ArgumentSchema;

    pub(crate) struct NewFile;

    impl Handler for NewFile {
        fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
            Ok(())
        }
    }

    impl EntryPoint for NewFile {
        fn schema() -> ArgumentSchema {
            panic!("phase-two schema consulted")
        }

        fn new(_context: HandlerContext) -> anyhow::Result<Self> {
            Ok(Self)
        }
    }
}

/// Indexed under `new_file` through an explicit name.
pub(crate) struct Scaffold;

impl Handler for Scaffold {
    fn run(&mut self, out: &mut dyn Write) -> anyhow::Result<()> {
        writeln!(out, "scaffolded")?;
        Ok(())
    }
}

impl EntryPoint for Scaffold {
    fn name() -> String {
        "new_file".to_owned()
    }

    fn new(_context: HandlerContext) -> anyhow::Result<Self> {
        Ok(Self)
    }
}

/// A `NewFile` declaring the same flag twice.
pub(crate) mod conflicted {
    use std::io::Write;

    use crate::handler::{EntryPoint, Handler, HandlerContext};
    use crate::schema::{ArgumentSchema, ArgumentSpec};

    pub(crate) struct NewFile;

    impl Handler for NewFile {
        fn run(&mut self, _out: &mut dyn Write) -> anyhow::Result<()> {
            Ok(())
        }
    }

    impl EntryPoint for NewFile {
        fn schema() -> ArgumentSchema {
            ArgumentSchema::new()
                .with(ArgumentSpec::flag("foo"))
                .with(ArgumentSpec::flag("foo"))
        }

        fn new(_context: HandlerContext) -> anyhow::Result<Self> {
            Ok(Self)
        }
    }
}
