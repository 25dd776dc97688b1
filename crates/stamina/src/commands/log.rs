//! `log:tail` command

use std::io::{self, Write};
use std::sync::Arc;

use stamina_host::{Command, CommandContext};

use crate::runtime::Runtime;

/// Prints the most recent log entries from the in-memory buffer.
pub struct LogTailCommand {
    runtime: Arc<Runtime>,
}

impl LogTailCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Command for LogTailCommand {
    fn name(&self) -> &str {
        "log:tail"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "log:tail - display buffered log entries")?;
        writeln!(out, "Usage: log:tail")
    }

    fn execute(&self, context: &mut CommandContext) -> stamina_core::Result<bool> {
        let entries = self.runtime.log_buffer.entries();
        if entries.is_empty() {
            writeln!(context.out(), "<no log entries>")?;
        }
        for entry in entries {
            writeln!(context.out(), "{entry}")?;
        }
        Ok(false)
    }
}
