//! Addon repository handling for Stamina
//!
//! This crate owns the repository side of the runtime:
//! - The resource/capability data model
//! - Reading and writing the XML repository index
//! - Indexing a directory of artifacts into a repository
//! - Resolving an addon reference to the best matching resource
//!
//! The selection rule (highest version wins, deterministic fallback for
//! version-less candidates) lives in [`resolver`] as a pure function so it
//! can be tested without touching the filesystem.

pub mod index;
pub mod indexer;
pub mod repository;
pub mod resolver;
pub mod types;

pub use indexer::RepositoryIndexer;
pub use repository::{Repository, RepositorySet};
pub use resolver::resolve;
pub use types::{Resource, ResourceKind};
