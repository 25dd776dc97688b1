//! Built-in modules
//!
//! Each module registers its commands at a fixed start level:
//!
//! | level | module       | commands                              |
//! |-------|--------------|---------------------------------------|
//! | 0     | boot         | help, version, system:stop/restart    |
//! | 5     | log          | log:tail                              |
//! | 10    | repo         | repo:list, repo:add, repo:remove      |
//! | 20    | addon        | addon:install (+ bootstrap installs)  |
//! | 30    | provisioning | provision:install                     |

use std::sync::Arc;

use stamina_core::Result;
use stamina_host::{CommandRegistry, Module};
use tracing::info;

use crate::commands::{
    AddonInstallCommand, HelpCommand, LogTailCommand, ProvisionInstallCommand, RepoAddCommand,
    RepoListCommand, RepoRemoveCommand, SystemRestartCommand, SystemStopCommand, VersionCommand,
};
use crate::commands::repo::load_repository_set;
use crate::runtime::Runtime;

/// All built-in modules, in no particular order; the host sorts by level.
pub fn builtin_modules(runtime: &Arc<Runtime>) -> Vec<Box<dyn Module>> {
    vec![
        Box::new(BootModule::new(runtime.clone())),
        Box::new(LogModule::new(runtime.clone())),
        Box::new(RepoModule::new(runtime.clone())),
        Box::new(AddonModule::new(runtime.clone())),
        Box::new(ProvisioningModule::new(runtime.clone())),
    ]
}

/// Core commands available before anything else starts.
pub struct BootModule {
    runtime: Arc<Runtime>,
}

impl BootModule {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Module for BootModule {
    fn name(&self) -> &str {
        "boot"
    }

    fn start_level(&self) -> u32 {
        0
    }

    fn start(&mut self, registry: &Arc<CommandRegistry>) -> Result<()> {
        registry.register(Arc::new(HelpCommand::new(Arc::downgrade(registry))));
        registry.register(Arc::new(VersionCommand));
        registry.register(Arc::new(SystemStopCommand::new(self.runtime.clone())));
        registry.register(Arc::new(SystemRestartCommand::new(self.runtime.clone())));
        Ok(())
    }
}

/// Log buffer access.
pub struct LogModule {
    runtime: Arc<Runtime>,
}

impl LogModule {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Module for LogModule {
    fn name(&self) -> &str {
        "log"
    }

    fn start_level(&self) -> u32 {
        5
    }

    fn start(&mut self, registry: &Arc<CommandRegistry>) -> Result<()> {
        registry.register(Arc::new(LogTailCommand::new(self.runtime.clone())));
        Ok(())
    }
}

/// Loads the repository set and registers the repo commands.
pub struct RepoModule {
    runtime: Arc<Runtime>,
}

impl RepoModule {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Module for RepoModule {
    fn name(&self) -> &str {
        "repo"
    }

    fn start_level(&self) -> u32 {
        10
    }

    fn start(&mut self, registry: &Arc<CommandRegistry>) -> Result<()> {
        let set = load_repository_set(&self.runtime)?;
        info!("Loaded {} repositories", set.len());
        *self.runtime.repositories.write().unwrap() = set;

        registry.register(Arc::new(RepoListCommand::new(self.runtime.clone())));
        registry.register(Arc::new(RepoAddCommand::new(self.runtime.clone())));
        registry.register(Arc::new(RepoRemoveCommand::new(self.runtime.clone())));
        Ok(())
    }
}

/// Addon installation, including the bootstrap `stamina.addons` list.
pub struct AddonModule {
    runtime: Arc<Runtime>,
}

impl AddonModule {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Module for AddonModule {
    fn name(&self) -> &str {
        "addon"
    }

    fn start_level(&self) -> u32 {
        20
    }

    fn start(&mut self, registry: &Arc<CommandRegistry>) -> Result<()> {
        let command = Arc::new(AddonInstallCommand::new(self.runtime.clone()));

        // Addons pinned in configuration are (re)installed on every start.
        if let Some(addons) = self.runtime.config.get("stamina.addons") {
            for spec in addons.split_whitespace() {
                command.install(spec)?;
            }
        }

        registry.register(command);
        Ok(())
    }
}

/// Descriptor-driven provisioning.
pub struct ProvisioningModule {
    runtime: Arc<Runtime>,
}

impl ProvisioningModule {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Module for ProvisioningModule {
    fn name(&self) -> &str {
        "provisioning"
    }

    fn start_level(&self) -> u32 {
        30
    }

    fn start(&mut self, registry: &Arc<CommandRegistry>) -> Result<()> {
        registry.register(Arc::new(ProvisionInstallCommand::new(self.runtime.clone())));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stamina_core::{Config, RuntimeDirs};
    use stamina_host::{LogBuffer, ModuleHost, Shutdown};
    use stamina_repo::RepositorySet;
    use std::fs;
    use std::sync::RwLock;
    use tempfile::TempDir;

    #[test]
    fn all_commands_register_on_start() {
        let home = TempDir::new().unwrap();
        fs::create_dir_all(home.path().join("sys")).unwrap();
        let config = Config::new();
        let dirs = RuntimeDirs::resolve(Some(home.path()), &config).unwrap();
        let runtime = Arc::new(Runtime {
            config,
            dirs,
            working_dir: home.path().to_path_buf(),
            repositories: RwLock::new(RepositorySet::new()),
            log_buffer: Arc::new(LogBuffer::new()),
            shutdown: Arc::new(Shutdown::new()),
        });

        let mut host = ModuleHost::new(Arc::new(CommandRegistry::new()));
        for module in builtin_modules(&runtime) {
            host.install(module);
        }
        host.start_all().unwrap();

        assert_eq!(
            host.registry().names(),
            vec![
                "addon:install",
                "help",
                "log:tail",
                "provision:install",
                "repo:add",
                "repo:list",
                "repo:remove",
                "system:restart",
                "system:stop",
                "version",
            ]
        );
        assert_eq!(runtime.repositories.read().unwrap().len(), 1);
    }
}
