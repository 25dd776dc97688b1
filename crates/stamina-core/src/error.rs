//! Error types for stamina-core

use thiserror::Error;

/// Result type alias using stamina-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Stamina
#[derive(Error, Debug)]
pub enum Error {
    /// Addon reference could not be parsed
    #[error("Malformed addon reference: {spec}")]
    MalformedAddonRef { spec: String },

    /// Invalid version string
    #[error("Invalid version format: {version}")]
    InvalidVersion { version: String },

    /// No repository provides the requested addon
    #[error("Addon not found: {spec}")]
    AddonNotFound { spec: String },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration content
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Required framework property is missing
    #[error("Missing framework property: {property}")]
    MissingProperty { property: String },

    /// Repository index could not be read
    #[error("Invalid repository index: {message}")]
    InvalidIndex { message: String },

    /// No command service matched the requested name
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },

    /// Invalid home directory
    #[error("Invalid home directory: {path}")]
    InvalidHomeDir { path: String },

    /// Download failure
    #[error("Download failed: {message}")]
    Http { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a malformed addon reference error
    pub fn malformed_addon_ref(spec: impl Into<String>) -> Self {
        Self::MalformedAddonRef { spec: spec.into() }
    }

    /// Create an invalid version error
    pub fn invalid_version(version: impl Into<String>) -> Self {
        Self::InvalidVersion {
            version: version.into(),
        }
    }

    /// Create an addon not found error
    pub fn addon_not_found(spec: impl Into<String>) -> Self {
        Self::AddonNotFound { spec: spec.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a missing property error
    pub fn missing_property(property: impl Into<String>) -> Self {
        Self::MissingProperty {
            property: property.into(),
        }
    }

    /// Create an invalid index error
    pub fn invalid_index(message: impl Into<String>) -> Self {
        Self::InvalidIndex {
            message: message.into(),
        }
    }

    /// Create a command not found error
    pub fn command_not_found(command: impl Into<String>) -> Self {
        Self::CommandNotFound {
            command: command.into(),
        }
    }

    /// Create a download failure error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }
}
