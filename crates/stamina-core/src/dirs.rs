//! Runtime directory resolution
//!
//! The launcher derives every path from the home directory: configuration
//! under `etc/`, framework state under `data/`, the system repository under
//! `sys/`. `stamina.data` and `stamina.repo` properties override the
//! defaults.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};

/// Environment variable naming the home directory.
pub const HOME_ENV: &str = "STAMINA_HOME";

/// Resolved runtime directories.
#[derive(Debug, Clone)]
pub struct RuntimeDirs {
    home: PathBuf,
    conf: PathBuf,
    data: PathBuf,
    system_repo: PathBuf,
}

impl RuntimeDirs {
    /// Resolve runtime directories.
    ///
    /// The home directory comes from the explicit override, then
    /// `STAMINA_HOME`, then the current directory; it must exist. The data
    /// and system repository directories may be redirected through
    /// `stamina.data` / `stamina.repo` properties.
    pub fn resolve(home_override: Option<&Path>, config: &Config) -> Result<Self> {
        let home = match home_override {
            Some(path) => path.to_path_buf(),
            None => match std::env::var_os(HOME_ENV) {
                Some(path) => PathBuf::from(path),
                None => std::env::current_dir()?,
            },
        };
        if !home.is_dir() {
            return Err(Error::InvalidHomeDir {
                path: home.display().to_string(),
            });
        }
        let home = home.canonicalize()?;

        let conf = home.join("etc");
        let data = config
            .get_path("stamina.data")
            .unwrap_or_else(|| home.join("data"));
        let system_repo = config
            .get_path("stamina.repo")
            .unwrap_or_else(|| home.join("sys"));

        Ok(Self {
            home,
            conf,
            data,
            system_repo,
        })
    }

    /// Home directory (canonical).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Configuration directory (`<home>/etc`).
    pub fn conf(&self) -> &Path {
        &self.conf
    }

    /// Data directory for framework state.
    pub fn data(&self) -> &Path {
        &self.data
    }

    /// System repository directory holding bootstrap artifacts.
    pub fn system_repo(&self) -> &Path {
        &self.system_repo
    }

    /// Directory receiving installed addons.
    pub fn addons(&self) -> PathBuf {
        self.data.join("addons")
    }

    /// Directory receiving provisioned artifacts.
    pub fn provision(&self) -> PathBuf {
        self.data.join("provision")
    }

    /// Generated repository index file.
    pub fn repo_index(&self) -> PathBuf {
        self.data.join("obr.xml")
    }

    /// Persisted one-shot command file.
    pub fn command_file(&self) -> PathBuf {
        self.data.join("cmd.dat")
    }
}
