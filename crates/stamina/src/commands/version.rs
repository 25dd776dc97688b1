//! `version` command

use std::io::{self, Write};

use stamina_host::{Command, CommandContext};

use crate::version::VersionInfo;

/// Prints launcher version information.
pub struct VersionCommand;

impl Command for VersionCommand {
    fn name(&self) -> &str {
        "version"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "version - display version information")?;
        writeln!(out, "Usage: version [--json]")
    }

    fn execute(&self, context: &mut CommandContext) -> stamina_core::Result<bool> {
        let info = VersionInfo::current();
        if context.arguments().iter().any(|a| a == "--json") {
            let json = serde_json::to_string_pretty(&info)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(context.out(), "{json}")?;
        } else {
            writeln!(context.out(), "{info}")?;
        }
        Ok(false)
    }
}
