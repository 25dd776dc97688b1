//! Built-in command implementations
//!
//! Each command implements the host `Command` trait and is registered by a
//! built-in module during bootstrap (see `modules`).

pub mod addon;
pub mod help;
pub mod log;
pub mod provision;
pub mod repo;
pub mod system;
pub mod version;

pub use addon::AddonInstallCommand;
pub use help::HelpCommand;
pub use log::LogTailCommand;
pub use provision::ProvisionInstallCommand;
pub use repo::{RepoAddCommand, RepoListCommand, RepoRemoveCommand};
pub use system::{SystemRestartCommand, SystemStopCommand};
pub use version::VersionCommand;
