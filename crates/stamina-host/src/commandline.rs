//! Persisted command-line record
//!
//! When the launcher is invoked with a command, it writes the command name
//! and arguments to a small binary file (`cmd.dat`) inside the data
//! directory. The dispatch side consumes the file exactly once: read,
//! published, deleted. Record layout is big-endian: a length-prefixed UTF-8
//! command (u16 length), a u32 argument count, then length-prefixed
//! arguments.

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use stamina_core::{Error, Result};
use tracing::debug;

/// Arguments above this count indicate a corrupt record.
const MAX_ARGUMENTS: u32 = 4096;

/// A command invocation persisted by the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    command: String,
    arguments: Vec<String>,
    working_dir: PathBuf,
}

impl CommandLine {
    /// Create a command line.
    pub fn new(
        command: impl Into<String>,
        arguments: Vec<String>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            command: command.into(),
            arguments,
            working_dir: working_dir.into(),
        }
    }

    /// Command name.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Command arguments.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Directory the launcher was invoked from.
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command)?;
        for arg in &self.arguments {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Write the command record, creating parent directories as needed.
pub fn write_command_file(path: &Path, command: &str, arguments: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    write_str(&mut file, command)?;
    file.write_all(&(arguments.len() as u32).to_be_bytes())?;
    for arg in arguments {
        write_str(&mut file, arg)?;
    }
    file.flush()?;
    debug!("Wrote command-line data file: {}", path.display());
    Ok(())
}

/// Read and delete the command record.
///
/// Returns `Ok(None)` when no file exists. The file is removed whether or
/// not decoding succeeded; a corrupt record must not be replayed on the
/// next boot.
pub fn consume_command_file(path: &Path, working_dir: &Path) -> Result<Option<CommandLine>> {
    if !path.exists() {
        debug!("No command-line data file found");
        return Ok(None);
    }
    debug!("Reading command-line data file: {}", path.display());
    let decoded = read_command_file(path, working_dir);
    std::fs::remove_file(path)?;
    decoded.map(Some)
}

fn read_command_file(path: &Path, working_dir: &Path) -> Result<CommandLine> {
    let mut file = File::open(path)?;
    let command = read_str(&mut file)?;
    if command.is_empty() {
        return Err(invalid("command is empty"));
    }

    let mut count_buf = [0u8; 4];
    file.read_exact(&mut count_buf)?;
    let count = u32::from_be_bytes(count_buf);
    if count > MAX_ARGUMENTS {
        return Err(invalid("incorrect number of arguments"));
    }

    let mut arguments = Vec::with_capacity(count as usize);
    for _ in 0..count {
        arguments.push(read_str(&mut file)?);
    }
    Ok(CommandLine::new(command, arguments, working_dir))
}

fn write_str(w: &mut impl Write, s: &str) -> Result<()> {
    let bytes = s.as_bytes();
    if bytes.len() > u16::MAX as usize {
        return Err(invalid("string too long"));
    }
    w.write_all(&(bytes.len() as u16).to_be_bytes())?;
    w.write_all(bytes)?;
    Ok(())
}

fn read_str(r: &mut impl Read) -> Result<String> {
    let mut len_buf = [0u8; 2];
    r.read_exact(&mut len_buf)?;
    let len = u16::from_be_bytes(len_buf) as usize;
    let mut bytes = vec![0u8; len];
    r.read_exact(&mut bytes)?;
    String::from_utf8(bytes).map_err(|_| invalid("string is not valid UTF-8"))
}

fn invalid(message: &str) -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::InvalidData,
        format!("Invalid command-line data file: {message}"),
    ))
}
