//! Repositories and repository sets
//!
//! A repository is a named, ordered collection of resources. A repository
//! set is the launcher's view over every configured repository, searched in
//! configuration order. Queries use the same requirement the original
//! runtime built for addon lookups: exact identity, feature type, and an
//! optional exact version.

use std::path::{Path, PathBuf};

use stamina_core::AddonRef;

use crate::types::{Resource, ResourceKind};

/// A named, ordered collection of resources.
#[derive(Debug, Clone)]
pub struct Repository {
    name: String,
    /// Millisecond timestamp bumped each time the index is generated.
    increment: u64,
    resources: Vec<Resource>,
}

impl Repository {
    /// Create a repository from resources.
    pub fn new(name: impl Into<String>, increment: u64, resources: Vec<Resource>) -> Self {
        Self {
            name: name.into(),
            increment,
            resources,
        }
    }

    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Index generation counter.
    pub fn increment(&self) -> u64 {
        self.increment
    }

    /// All resources, in index order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Find every feature resource matching an addon reference.
    ///
    /// Addons ship as feature subsystems; bundles and fragments are never
    /// addon-resolution candidates.
    pub fn find_addons(&self, addon: &AddonRef) -> Vec<&Resource> {
        self.resources
            .iter()
            .filter(|r| r.kind == ResourceKind::Feature)
            .filter(|r| r.matches(addon.name(), addon.version()))
            .collect()
    }
}

/// Ordered collection of repositories, searched in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RepositorySet {
    repositories: Vec<(PathBuf, Repository)>,
}

impl RepositorySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a repository, remembering the index file it came from.
    pub fn add(&mut self, index_file: PathBuf, repository: Repository) {
        self.repositories.push((index_file, repository));
    }

    /// Repositories with their index file locations, in search order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Repository)> {
        self.repositories
            .iter()
            .map(|(path, repo)| (path.as_path(), repo))
    }

    /// Number of repositories.
    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Collect addon candidates across every repository, in search order.
    pub fn find_addons(&self, addon: &AddonRef) -> Vec<&Resource> {
        self.repositories
            .iter()
            .flat_map(|(_, repo)| repo.find_addons(addon))
            .collect()
    }
}
