//! Platform lifecycle commands
//!
//! `system:stop` and `system:restart` request shutdown through the shared
//! latch. The first request wins, so a restart requested here is not
//! downgraded by the dispatch thread's stop-after-command default.

use std::io::{self, Write};
use std::sync::Arc;

use stamina_host::{Command, CommandContext, StopSignal};

use crate::runtime::Runtime;

/// Stops the platform.
pub struct SystemStopCommand {
    runtime: Arc<Runtime>,
}

impl SystemStopCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Command for SystemStopCommand {
    fn name(&self) -> &str {
        "system:stop"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "system:stop - stop the platform")?;
        writeln!(out, "Usage: system:stop")
    }

    fn execute(&self, context: &mut CommandContext) -> stamina_core::Result<bool> {
        writeln!(context.out(), "Stopping platform")?;
        self.runtime.shutdown.request(StopSignal::Stop);
        Ok(true)
    }
}

/// Stops the platform with the restart exit code, signalling the wrapper
/// script to start a fresh process.
pub struct SystemRestartCommand {
    runtime: Arc<Runtime>,
}

impl SystemRestartCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Command for SystemRestartCommand {
    fn name(&self) -> &str {
        "system:restart"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "system:restart - restart the platform")?;
        writeln!(out, "Usage: system:restart")
    }

    fn execute(&self, context: &mut CommandContext) -> stamina_core::Result<bool> {
        writeln!(context.out(), "Restarting platform")?;
        self.runtime.shutdown.request(StopSignal::Restart);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stamina_core::{Config, RuntimeDirs};
    use stamina_host::{LogBuffer, Shutdown};
    use stamina_repo::RepositorySet;
    use std::path::PathBuf;
    use std::sync::RwLock;
    use tempfile::TempDir;

    fn runtime(home: &TempDir) -> Arc<Runtime> {
        let config = Config::new();
        let dirs = RuntimeDirs::resolve(Some(home.path()), &config).unwrap();
        Arc::new(Runtime {
            config,
            dirs,
            working_dir: home.path().to_path_buf(),
            repositories: RwLock::new(RepositorySet::new()),
            log_buffer: Arc::new(LogBuffer::new()),
            shutdown: Arc::new(Shutdown::new()),
        })
    }

    fn context() -> CommandContext {
        CommandContext::new(
            vec![],
            PathBuf::from("."),
            Box::new(Vec::new()),
            Box::new(Vec::new()),
        )
    }

    #[test]
    fn restart_request_is_not_downgraded() {
        let home = TempDir::new().unwrap();
        let rt = runtime(&home);
        let command = SystemRestartCommand::new(rt.clone());
        command.execute(&mut context()).unwrap();

        // A later stop request loses to the earlier restart.
        rt.shutdown.request(StopSignal::Stop);
        assert_eq!(rt.shutdown.wait(), StopSignal::Restart);
        assert_eq!(rt.shutdown.wait().exit_code(), 100);
    }

    #[test]
    fn stop_requests_plain_shutdown() {
        let home = TempDir::new().unwrap();
        let rt = runtime(&home);
        let command = SystemStopCommand::new(rt.clone());
        command.execute(&mut context()).unwrap();
        assert_eq!(rt.shutdown.wait().exit_code(), 0);
    }
}
