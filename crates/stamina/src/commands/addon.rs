//! `addon:install` command

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use stamina_core::{AddonRef, Error, Result};
use stamina_host::{Command, CommandContext};
use stamina_repo::resolver;
use tracing::{debug, info};

use crate::runtime::Runtime;

/// Resolves addon references against the configured repositories and copies
/// the selected feature artifact into the addons directory.
pub struct AddonInstallCommand {
    runtime: Arc<Runtime>,
}

impl AddonInstallCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }

    /// Install a single addon. Returns the installed artifact path.
    ///
    /// Installing an already-present addon is a no-op, matching the
    /// bootstrap path where `stamina.addons` is re-applied on every start.
    pub fn install(&self, spec: &str) -> Result<PathBuf> {
        let addon: AddonRef = spec.parse()?;
        let repositories = self.runtime.repositories.read().unwrap();
        let resource = resolver::resolve(&repositories, &addon)?;

        let file_name = resource
            .url
            .file_name()
            .ok_or_else(|| Error::invalid_index(format!("resource has no file name: {addon}")))?;
        let addons_dir = self.runtime.dirs.addons();
        std::fs::create_dir_all(&addons_dir)?;
        let target = addons_dir.join(file_name);

        if target.exists() {
            debug!("Addon already installed: {}", addon);
            return Ok(target);
        }

        info!(
            "Installing addon {} from {}",
            addon,
            resource.url.display()
        );
        std::fs::copy(&resource.url, &target)?;
        Ok(target)
    }
}

impl Command for AddonInstallCommand {
    fn name(&self) -> &str {
        "addon:install"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "addon:install - install addons from repositories")?;
        writeln!(out, "Usage: addon:install <name>[/<version>] ...")?;
        writeln!(
            out,
            "Without a version, the highest available version is selected."
        )
    }

    fn execute(&self, context: &mut CommandContext) -> Result<bool> {
        let arguments = context.arguments().to_vec();
        if arguments.is_empty() {
            self.help(context.out())?;
            return Ok(false);
        }

        for spec in &arguments {
            let target = self.install(spec)?;
            writeln!(
                context.out(),
                "Installed {} -> {}",
                spec,
                target.display()
            )?;
        }
        Ok(false)
    }
}
