//! # stamina-core
//!
//! Core library for the Stamina runtime providing:
//! - Addon reference parsing (`addon:<name>[/<version>]`)
//! - Properties-style configuration loading with `${includes}` expansion
//! - Runtime directory resolution (home, conf, data, system repository)
//! - Shared error types

pub mod addon;
pub mod config;
pub mod dirs;
pub mod error;

pub use addon::{parse_lenient_version, AddonRef};
pub use config::Config;
pub use dirs::RuntimeDirs;
pub use error::{Error, Result};
