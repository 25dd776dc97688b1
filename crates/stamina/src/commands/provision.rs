//! `provision:install` command
//!
//! Reads provisioning descriptors (one artifact URL per line, `#` comments)
//! and materializes each artifact under the data directory. Artifact files
//! are named by the SHA-256 of their source URL so re-provisioning the same
//! descriptor is idempotent; configuration artifacts (`.cfg`) land in the
//! configuration directory instead.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use sha2::{Digest, Sha256};
use stamina_core::{AddonRef, Error, Result};
use stamina_host::{Command, CommandContext};
use stamina_repo::resolver;
use tracing::{debug, info};
use url::Url;

use crate::runtime::Runtime;

/// Installs artifacts listed in provisioning descriptors.
pub struct ProvisionInstallCommand {
    runtime: Arc<Runtime>,
    client: OnceLock<reqwest::blocking::Client>,
}

impl ProvisionInstallCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            runtime,
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> &reqwest::blocking::Client {
        self.client.get_or_init(|| {
            reqwest::blocking::Client::builder()
                .user_agent(concat!("StaminaFramework/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_default()
        })
    }

    fn download(&self, url: &Url) -> Result<Vec<u8>> {
        debug!("Downloading {}", url);
        let response = self
            .client()
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::http(e.to_string()))?;
        let bytes = response
            .bytes()
            .map_err(|e| Error::http(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Fetch the content behind an artifact URL.
    fn fetch(&self, spec: &str) -> Result<Vec<u8>> {
        if spec.starts_with("addon:") {
            let addon: AddonRef = spec.parse()?;
            let repositories = self.runtime.repositories.read().unwrap();
            let resource = resolver::resolve(&repositories, &addon)?;
            return Ok(std::fs::read(&resource.url)?);
        }
        if let Ok(url) = Url::parse(spec) {
            match url.scheme() {
                "http" | "https" => return self.download(&url),
                "file" => return Ok(std::fs::read(url.path())?),
                _ => {}
            }
        }
        Ok(std::fs::read(spec)?)
    }

    /// Install a single artifact, returning its target path, or `None` when
    /// it was already present and `force` was not given.
    fn install_artifact(&self, spec: &str, force: bool) -> Result<Option<PathBuf>> {
        let file_name = artifact_file_name(spec);
        let target_dir = if file_name.ends_with(".cfg") {
            self.runtime.dirs.conf().to_path_buf()
        } else {
            self.runtime.dirs.provision()
        };
        std::fs::create_dir_all(&target_dir)?;
        let target = target_dir.join(&file_name);

        if target.exists() && !force {
            debug!("Artifact already provisioned: {}", spec);
            return Ok(None);
        }

        let content = self.fetch(spec)?;
        let mut staged = tempfile::NamedTempFile::new_in(&target_dir)?;
        staged.write_all(&content)?;
        staged
            .persist(&target)
            .map_err(|e| io::Error::from(e.error))?;
        info!("Provisioned {} -> {}", spec, target.display());
        Ok(Some(target))
    }

    /// Read a descriptor from a local file or an HTTP location.
    fn read_descriptor(&self, location: &str) -> Result<String> {
        if let Ok(url) = Url::parse(location) {
            if matches!(url.scheme(), "http" | "https") {
                let bytes = self.download(&url)?;
                return String::from_utf8(bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into());
            }
        }
        Ok(std::fs::read_to_string(location)?)
    }
}

/// Artifact file name: SHA-256 of the source URL, extension guessed from it.
fn artifact_file_name(spec: &str) -> String {
    let hash = hex::encode(Sha256::digest(spec.as_bytes()));
    format!("{hash}{}", artifact_extension(spec))
}

fn artifact_extension(spec: &str) -> &'static str {
    let lower = spec.to_ascii_lowercase();
    if lower.starts_with("addon:") || lower.ends_with(".esa") {
        ".esa"
    } else if lower.ends_with(".cfg") {
        ".cfg"
    } else {
        ".jar"
    }
}

impl Command for ProvisionInstallCommand {
    fn name(&self) -> &str {
        "provision:install"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "provision:install - provision platform artifacts")?;
        writeln!(
            out,
            "Usage: provision:install [--force] [--start] <descriptor> ..."
        )?;
        writeln!(out, "  --force  overwrite already provisioned artifacts")?;
        writeln!(out, "  --start  keep the platform running afterwards")
    }

    fn execute(&self, context: &mut CommandContext) -> Result<bool> {
        let arguments = context.arguments().to_vec();
        let force = arguments.iter().any(|a| a == "--force");
        let start = arguments.iter().any(|a| a == "--start");
        let descriptors: Vec<&String> =
            arguments.iter().filter(|a| !a.starts_with("--")).collect();

        if descriptors.is_empty() {
            self.help(context.out())?;
            return Ok(false);
        }

        writeln!(context.out(), "Starting platform provisioning")?;
        for descriptor in descriptors {
            let content = self.read_descriptor(descriptor)?;
            for line in content.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                match self.install_artifact(line, force)? {
                    Some(target) => {
                        writeln!(context.out(), "Provisioned {} -> {}", line, target.display())?
                    }
                    None => writeln!(context.out(), "Already provisioned: {line}")?,
                }
            }
        }
        writeln!(context.out(), "Platform provisioning done")?;
        Ok(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stamina_core::{Config, RuntimeDirs};
    use stamina_host::{LogBuffer, Shutdown};
    use stamina_repo::RepositorySet;
    use std::fs;
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

    #[test]
    fn extension_follows_source_url() {
        assert_eq!(artifact_extension("addon:stamina-realm"), ".esa");
        assert_eq!(artifact_extension("http://x/feature.ESA"), ".esa");
        assert_eq!(artifact_extension("http://x/settings.cfg"), ".cfg");
        assert_eq!(artifact_extension("http://x/library.jar"), ".jar");
        assert_eq!(artifact_extension("http://x/no-extension"), ".jar");
    }

    #[test]
    fn file_name_is_stable_per_url() {
        let a = artifact_file_name("http://example.com/a.jar");
        let b = artifact_file_name("http://example.com/a.jar");
        let c = artifact_file_name("http://example.com/b.jar");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64 + 4);
    }

    #[test]
    fn provisions_local_artifacts_idempotently() {
        let home = TempDir::new().unwrap();
        let rt = runtime(&home);
        let command = ProvisionInstallCommand::new(rt.clone());

        let artifact = home.path().join("library.jar");
        fs::write(&artifact, b"bytes").unwrap();
        let spec = artifact.display().to_string();

        let target = command.install_artifact(&spec, false).unwrap().unwrap();
        assert!(target.starts_with(rt.dirs.provision()));
        assert_eq!(fs::read(&target).unwrap(), b"bytes");

        // Second run skips, --force reinstalls.
        assert!(command.install_artifact(&spec, false).unwrap().is_none());
        assert!(command.install_artifact(&spec, true).unwrap().is_some());
    }

    #[test]
    fn cfg_artifacts_land_in_conf_dir() {
        let home = TempDir::new().unwrap();
        let rt = runtime(&home);
        let command = ProvisionInstallCommand::new(rt.clone());

        let artifact = home.path().join("settings.cfg");
        fs::write(&artifact, b"key=value").unwrap();

        let target = command
            .install_artifact(&artifact.display().to_string(), false)
            .unwrap()
            .unwrap();
        assert!(target.starts_with(rt.dirs.conf()));
    }

    #[test]
    fn descriptor_lines_drive_installation() {
        let home = TempDir::new().unwrap();
        let rt = runtime(&home);
        let command = ProvisionInstallCommand::new(rt.clone());

        let artifact = home.path().join("library.jar");
        fs::write(&artifact, b"bytes").unwrap();
        let descriptor = home.path().join("bootstrap.spf");
        fs::write(
            &descriptor,
            format!("# bootstrap profile\n\n{}\n", artifact.display()),
        )
        .unwrap();

        let mut context = CommandContext::new(
            vec![descriptor.display().to_string()],
            home.path().to_path_buf(),
            Box::new(Vec::new()),
            Box::new(Vec::new()),
        );
        let keep_running = command.execute(&mut context).unwrap();
        assert!(!keep_running);
        assert_eq!(fs::read_dir(rt.dirs.provision()).unwrap().count(), 1);
    }

    #[test]
    fn start_flag_keeps_platform_running() {
        let home = TempDir::new().unwrap();
        let rt = runtime(&home);
        let command = ProvisionInstallCommand::new(rt);

        let descriptor = home.path().join("empty.spf");
        fs::write(&descriptor, "# nothing\n").unwrap();

        let mut context = CommandContext::new(
            vec!["--start".to_string(), descriptor.display().to_string()],
            home.path().to_path_buf(),
            Box::new(Vec::new()),
            Box::new(Vec::new()),
        );
        assert!(command.execute(&mut context).unwrap());
    }
}
