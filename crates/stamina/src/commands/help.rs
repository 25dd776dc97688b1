//! `help` command

use std::io::{self, Write};
use std::sync::Weak;

use stamina_host::{Command, CommandContext, CommandRegistry};

/// Lists registered commands, or prints the usage of a specific one.
///
/// Holds a weak reference to the registry: the registry owns every command,
/// so a strong reference here would form a cycle.
pub struct HelpCommand {
    registry: Weak<CommandRegistry>,
}

impl HelpCommand {
    pub fn new(registry: Weak<CommandRegistry>) -> Self {
        Self { registry }
    }
}

impl Command for HelpCommand {
    fn name(&self) -> &str {
        "help"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "help - display available commands")?;
        writeln!(out, "Usage: help [<command> ...]")
    }

    fn execute(&self, context: &mut CommandContext) -> stamina_core::Result<bool> {
        let Some(registry) = self.registry.upgrade() else {
            return Ok(false);
        };

        let arguments = context.arguments().to_vec();
        if arguments.is_empty() {
            writeln!(context.out(), "Available commands:")?;
            for name in registry.names() {
                writeln!(context.out(), "  {name}")?;
            }
            writeln!(context.out(), "Run 'help <command>' for usage.")?;
        } else {
            for name in &arguments {
                match registry.get(name) {
                    Some(command) => command.help(context.out())?,
                    None => writeln!(context.err(), "Unknown command: {name}")?,
                }
            }
        }
        Ok(false)
    }
}
