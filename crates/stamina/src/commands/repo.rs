//! Repository management commands
//!
//! `repo:list`, `repo:add` and `repo:remove` operate on the launcher's
//! repository set. Extra index locations persist in
//! `etc/repositories.properties` under the `obr.repository.url` key, a
//! space-separated list searched after the system repository.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use stamina_core::{Config, Result};
use stamina_host::{Command, CommandContext};
use stamina_repo::{index, RepositoryIndexer, RepositorySet};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::warn;

use crate::runtime::Runtime;

/// Property naming the extra repository index locations.
pub const REPOSITORY_URLS_KEY: &str = "obr.repository.url";

/// File persisting the extra repository index locations.
pub fn repositories_file(runtime: &Runtime) -> PathBuf {
    runtime.dirs.conf().join("repositories.properties")
}

/// Extra repository index locations, in configuration order.
///
/// The persisted file wins over the framework configuration so additions
/// made through `repo:add` survive restarts without editing the framework
/// properties.
pub fn configured_repository_urls(runtime: &Runtime) -> Vec<String> {
    let file = repositories_file(runtime);
    let value = if file.is_file() {
        Config::load(&file)
            .map(|c| c.get(REPOSITORY_URLS_KEY).map(str::to_string))
            .unwrap_or_default()
    } else {
        runtime.config.get(REPOSITORY_URLS_KEY).map(str::to_string)
    };
    value
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

fn index_path(url: &str) -> PathBuf {
    PathBuf::from(url.strip_prefix("file:").unwrap_or(url))
}

/// Build the repository set: the generated system repository index first,
/// then every configured extra index. Unreadable extras are skipped with a
/// warning so one broken index does not take the platform down.
pub fn load_repository_set(runtime: &Runtime) -> Result<RepositorySet> {
    let mut set = RepositorySet::new();

    let indexer = RepositoryIndexer::new(runtime.dirs.system_repo(), runtime.dirs.repo_index());
    let reindex = runtime.config.get_bool("stamina.obr.reindex");
    set.add(runtime.dirs.repo_index(), indexer.load_or_index(reindex)?);

    for url in configured_repository_urls(runtime) {
        let path = index_path(&url);
        match index::read_index(&path) {
            Ok(repository) => set.add(path, repository),
            Err(e) => warn!("Skipping unreadable repository index {}: {}", url, e),
        }
    }
    Ok(set)
}

fn save_repository_urls(runtime: &Runtime, urls: &[String]) -> Result<()> {
    let file = repositories_file(runtime);
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut content = String::from("# Extra repository indexes, space separated.\n");
    content.push_str(REPOSITORY_URLS_KEY);
    content.push('=');
    content.push_str(&urls.join(" "));
    content.push('\n');
    std::fs::write(&file, content)?;
    Ok(())
}

fn reload(runtime: &Runtime) -> Result<()> {
    let set = load_repository_set(runtime)?;
    *runtime.repositories.write().unwrap() = set;
    Ok(())
}

#[derive(Tabled)]
struct RepoRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Resources")]
    resources: usize,
    #[tabled(rename = "Location")]
    location: String,
}

/// Prints the repository set as a table.
pub struct RepoListCommand {
    runtime: Arc<Runtime>,
}

impl RepoListCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Command for RepoListCommand {
    fn name(&self) -> &str {
        "repo:list"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "repo:list - display configured repositories")?;
        writeln!(out, "Usage: repo:list [--json]")
    }

    fn execute(&self, context: &mut CommandContext) -> Result<bool> {
        let repositories = self.runtime.repositories.read().unwrap();

        if context.arguments().iter().any(|a| a == "--json") {
            let resources: std::collections::BTreeMap<&str, _> = repositories
                .iter()
                .map(|(_, repo)| (repo.name(), repo.resources()))
                .collect();
            let json = serde_json::to_string_pretty(&resources)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(context.out(), "{json}")?;
            return Ok(false);
        }

        let rows: Vec<RepoRow> = repositories
            .iter()
            .map(|(path, repo)| RepoRow {
                name: repo.name().to_string(),
                resources: repo.resources().len(),
                location: path.display().to_string(),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::sharp());
        writeln!(context.out(), "{table}")?;
        Ok(false)
    }
}

/// Registers extra repository indexes.
pub struct RepoAddCommand {
    runtime: Arc<Runtime>,
}

impl RepoAddCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Command for RepoAddCommand {
    fn name(&self) -> &str {
        "repo:add"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "repo:add - register a repository index")?;
        writeln!(out, "Usage: repo:add <index-file> ...")
    }

    fn execute(&self, context: &mut CommandContext) -> Result<bool> {
        let arguments = context.arguments().to_vec();
        if arguments.is_empty() {
            self.help(context.out())?;
            return Ok(false);
        }

        let mut urls = configured_repository_urls(&self.runtime);
        for url in &arguments {
            // Validate before persisting anything.
            index::read_index(&index_path(url))?;
            if urls.iter().any(|u| u == url) {
                writeln!(context.err(), "Repository already registered: {url}")?;
                continue;
            }
            urls.push(url.clone());
            writeln!(context.out(), "Repository added: {url}")?;
        }
        save_repository_urls(&self.runtime, &urls)?;
        reload(&self.runtime)?;
        Ok(false)
    }
}

/// Unregisters extra repository indexes.
pub struct RepoRemoveCommand {
    runtime: Arc<Runtime>,
}

impl RepoRemoveCommand {
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self { runtime }
    }
}

impl Command for RepoRemoveCommand {
    fn name(&self) -> &str {
        "repo:remove"
    }

    fn help(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "repo:remove - unregister a repository index")?;
        writeln!(out, "Usage: repo:remove <index-file> ...")
    }

    fn execute(&self, context: &mut CommandContext) -> Result<bool> {
        let arguments = context.arguments().to_vec();
        if arguments.is_empty() {
            self.help(context.out())?;
            return Ok(false);
        }

        let mut urls = configured_repository_urls(&self.runtime);
        for url in &arguments {
            let before = urls.len();
            urls.retain(|u| u != url);
            if urls.len() == before {
                writeln!(context.err(), "Repository not registered: {url}")?;
            } else {
                writeln!(context.out(), "Repository removed: {url}")?;
            }
        }
        save_repository_urls(&self.runtime, &urls)?;
        reload(&self.runtime)?;
        Ok(false)
    }
}
