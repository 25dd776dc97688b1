//! Shared runtime state for built-in commands

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use stamina_core::{Config, RuntimeDirs};
use stamina_host::{LogBuffer, Shutdown};
use stamina_repo::RepositorySet;

/// State shared between the launcher and every built-in command.
pub struct Runtime {
    /// Merged framework configuration.
    pub config: Config,
    /// Resolved runtime directories.
    pub dirs: RuntimeDirs,
    /// Directory the launcher was invoked from.
    pub working_dir: PathBuf,
    /// Configured repositories; reloadable by the repo commands.
    pub repositories: RwLock<RepositorySet>,
    /// Ring buffer fed by the log bridge layer.
    pub log_buffer: Arc<LogBuffer>,
    /// Cooperative shutdown latch.
    pub shutdown: Arc<Shutdown>,
}

impl Runtime {
    /// Command dispatch timeout from `stamina.command.timeout`, in seconds.
    pub fn command_timeout_secs(&self) -> u64 {
        self.config
            .get("stamina.command.timeout")
            .and_then(|v| v.parse().ok())
            .unwrap_or(30)
    }
}
