//! Host-runtime boundary for Stamina
//!
//! The original runtime delegated lifecycle and service lookup to a host
//! module framework. This crate models exactly the slice the launcher needs:
//! - A [`Command`](command::Command) trait and a registry with timed waits
//! - The one-shot command dispatch thread
//! - The persisted command-file codec (`cmd.dat`)
//! - Start-level ordered module activation
//! - A bounded in-memory log buffer wired in as a tracing layer
//!
//! Everything heavier (dependency wiring, dynamic loading, subsystem
//! resolution) stays out of scope.

pub mod command;
pub mod commandline;
pub mod dispatch;
pub mod logbuf;
pub mod module;
pub mod registry;

pub use command::{Command, CommandContext};
pub use commandline::CommandLine;
pub use dispatch::{join_with_timeout, spawn_dispatcher, Shutdown, StopSignal};
pub use logbuf::{BufferLayer, LogBuffer};
pub use module::{Module, ModuleHost};
pub use registry::CommandRegistry;
