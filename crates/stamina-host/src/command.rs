//! Command service contract
//!
//! Commands are named services modules register with the host. The dispatch
//! thread looks one up by name and runs it once; the boolean returned by
//! `execute` is the command's keep-running intent (true keeps the host
//! process alive after the command finishes).

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use stamina_core::Result;

/// Execution context handed to a command.
pub struct CommandContext {
    arguments: Vec<String>,
    working_dir: PathBuf,
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl CommandContext {
    /// Create a context writing to the given streams.
    pub fn new(
        arguments: Vec<String>,
        working_dir: PathBuf,
        out: Box<dyn Write + Send>,
        err: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            arguments,
            working_dir,
            out,
            err,
        }
    }

    /// Context writing to the process stdout/stderr.
    pub fn for_stdio(arguments: Vec<String>, working_dir: PathBuf) -> Self {
        Self::new(
            arguments,
            working_dir,
            Box::new(io::stdout()),
            Box::new(io::stderr()),
        )
    }

    /// Command arguments (the command name itself excluded).
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Working directory the launcher was invoked from.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Output stream.
    pub fn out(&mut self) -> &mut dyn Write {
        &mut self.out
    }

    /// Error stream.
    pub fn err(&mut self) -> &mut dyn Write {
        &mut self.err
    }
}

/// A named command service.
pub trait Command: Send + Sync {
    /// Name the command is dispatched by, e.g. `addon:install`.
    fn name(&self) -> &str;

    /// Print usage help.
    fn help(&self, out: &mut dyn Write) -> io::Result<()>;

    /// Run the command. Returns true to keep the host process running
    /// after execution.
    fn execute(&self, context: &mut CommandContext) -> Result<bool>;
}
