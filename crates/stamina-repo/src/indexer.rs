//! System repository indexing
//!
//! Walks a repository directory for deployable artifacts (`.esa` features,
//! `.jar` bundles), computes content checksums and sizes, and generates the
//! XML index consumed by the resolver. Identity and version are derived from
//! the artifact file name (`<identity>-<version>.<ext>`, version optional).

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use stamina_core::{parse_lenient_version, Result};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::index;
use crate::repository::Repository;
use crate::types::{Resource, ResourceKind};

/// Default repository name used for generated indexes.
pub const SYSTEM_REPOSITORY_NAME: &str = "Stamina Runtime System Repository";

/// Indexes a directory of artifacts into a repository.
pub struct RepositoryIndexer {
    repo_dir: PathBuf,
    index_file: PathBuf,
}

impl RepositoryIndexer {
    /// Create an indexer over a repository directory.
    pub fn new(repo_dir: impl Into<PathBuf>, index_file: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
            index_file: index_file.into(),
        }
    }

    /// Load the index, generating it first when missing or empty.
    ///
    /// With `reindex` set, any existing index is discarded and regenerated,
    /// mirroring the original `reindex` component configuration flag.
    pub fn load_or_index(&self, reindex: bool) -> Result<Repository> {
        if reindex && self.index_file.exists() {
            debug!("System repository index will be regenerated");
            std::fs::remove_file(&self.index_file)?;
        }

        let stale = match std::fs::metadata(&self.index_file) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };
        if stale {
            info!("Indexing system repository: {}", self.repo_dir.display());
            let repository = self.index()?;
            if let Some(parent) = self.index_file.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&self.index_file, index::write_index(&repository))?;
            return Ok(repository);
        }

        index::read_index(&self.index_file)
    }

    /// Scan the repository directory and build a repository in memory.
    pub fn index(&self) -> Result<Repository> {
        let mut resources = Vec::new();

        if self.repo_dir.is_dir() {
            for entry in WalkDir::new(&self.repo_dir)
                .follow_links(true)
                .sort_by_file_name()
            {
                let entry = entry.map_err(std::io::Error::from)?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                let Some(kind) = kind_from_extension(path) else {
                    continue;
                };
                resources.push(describe_artifact(path, kind)?);
            }
        }

        debug!("Indexed {} artifacts", resources.len());
        let increment = chrono::Utc::now().timestamp_millis().max(0) as u64;
        Ok(Repository::new(
            SYSTEM_REPOSITORY_NAME,
            increment,
            resources,
        ))
    }
}

fn kind_from_extension(path: &Path) -> Option<ResourceKind> {
    match path.extension()?.to_str()? {
        "esa" => Some(ResourceKind::Feature),
        "jar" => Some(ResourceKind::Bundle),
        _ => None,
    }
}

fn describe_artifact(path: &Path, kind: ResourceKind) -> Result<Resource> {
    let content = std::fs::read(path)?;
    let sha256 = hex::encode(Sha256::digest(&content));
    let size = content.len() as u64;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let (identity, version) = split_identity_version(stem);

    Ok(Resource {
        identity,
        version,
        kind,
        url: path.to_path_buf(),
        size,
        sha256,
    })
}

/// Split an artifact file stem into identity and version.
///
/// The version is the suffix after the last `-` that parses as a version;
/// identities may themselves contain dashes (`stamina-realm-1.3.0`).
fn split_identity_version(stem: &str) -> (String, Option<semver::Version>) {
    if let Some((identity, suffix)) = stem.rsplit_once('-') {
        if !identity.is_empty() {
            if let Ok(version) = parse_lenient_version(suffix) {
                return (identity.to_string(), Some(version));
            }
        }
    }
    (stem.to_string(), None)
}
