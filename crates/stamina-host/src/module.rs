//! Module lifecycle
//!
//! Built-in modules are started in ascending start-level order,
//! alphabetically within a level, and stopped in reverse start order. A
//! module failing to start is fatal to bootstrap; stop failures are logged
//! and do not abort shutdown.

use std::sync::Arc;

use stamina_core::Result;
use tracing::{debug, error, info};

use crate::registry::CommandRegistry;

/// A unit of host functionality with a start level.
pub trait Module: Send {
    /// Module name, used for within-level ordering and logging.
    fn name(&self) -> &str;

    /// Start level; lower levels start first.
    fn start_level(&self) -> u32 {
        1
    }

    /// Start the module, typically registering commands.
    fn start(&mut self, registry: &Arc<CommandRegistry>) -> Result<()>;

    /// Stop the module.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Hosts modules and the shared command registry.
pub struct ModuleHost {
    registry: Arc<CommandRegistry>,
    modules: Vec<Box<dyn Module>>,
    started: usize,
}

impl ModuleHost {
    /// Create a host around a registry.
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self {
            registry,
            modules: Vec::new(),
            started: 0,
        }
    }

    /// Shared command registry.
    pub fn registry(&self) -> &Arc<CommandRegistry> {
        &self.registry
    }

    /// Install a module. Has no effect on already-started hosts until
    /// `start_all` runs again.
    pub fn install(&mut self, module: Box<dyn Module>) {
        debug!(
            "Installing module: {} (start level {})",
            module.name(),
            module.start_level()
        );
        self.modules.push(module);
    }

    /// Start every installed module by start level, alphabetically within a
    /// level. The first failure aborts bootstrap.
    pub fn start_all(&mut self) -> Result<()> {
        self.modules
            .sort_by(|a, b| (a.start_level(), a.name()).cmp(&(b.start_level(), b.name())));

        for module in &mut self.modules[self.started..] {
            info!("Starting module: {}", module.name());
            module.start(&self.registry)?;
        }
        self.started = self.modules.len();
        Ok(())
    }

    /// Stop modules in reverse start order and close the registry.
    pub fn stop_all(&mut self) {
        self.registry.close();
        for module in self.modules[..self.started].iter_mut().rev() {
            debug!("Stopping module: {}", module.name());
            if let Err(e) = module.stop() {
                error!("Failed to stop module {}: {}", module.name(), e);
            }
        }
        self.started = 0;
    }
}
