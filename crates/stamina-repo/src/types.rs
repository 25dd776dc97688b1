//! Repository data model

use std::path::PathBuf;

use semver::Version;
use serde::Serialize;

/// Kind of deployable resource held by a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// A plain bundle artifact (`.jar`).
    Bundle,
    /// A fragment bundle, attached to a host at runtime.
    Fragment,
    /// A feature subsystem (`.esa`), the unit addons ship as.
    Feature,
}

impl ResourceKind {
    /// Wire type string used in repository indexes.
    pub fn wire_type(&self) -> &'static str {
        match self {
            Self::Bundle => "osgi.bundle",
            Self::Fragment => "osgi.fragment",
            Self::Feature => "osgi.subsystem.feature",
        }
    }

    /// MIME type associated with this resource kind.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Bundle | Self::Fragment => "application/vnd.osgi.bundle",
            Self::Feature => "application/vnd.osgi.subsystem",
        }
    }

    /// Parse the wire type string.
    pub fn from_wire_type(s: &str) -> Option<Self> {
        match s {
            "osgi.bundle" => Some(Self::Bundle),
            "osgi.fragment" => Some(Self::Fragment),
            "osgi.subsystem.feature" => Some(Self::Feature),
            _ => None,
        }
    }
}

/// A deployable resource described by a repository index.
///
/// Exposes two capabilities in index form: identity (identity, type,
/// version) and content (checksum, url, size).
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    /// Symbolic name.
    pub identity: String,
    /// Resource version; indexes may omit it.
    pub version: Option<Version>,
    /// Resource kind.
    pub kind: ResourceKind,
    /// Location of the resource content (a filesystem path).
    pub url: PathBuf,
    /// Content size in bytes.
    pub size: u64,
    /// Hex-encoded SHA-256 of the content.
    pub sha256: String,
}

impl Resource {
    /// Whether this resource matches an exact identity and optional version.
    pub fn matches(&self, identity: &str, version: Option<&Version>) -> bool {
        if self.identity != identity {
            return false;
        }
        match version {
            None => true,
            Some(wanted) => self.version.as_ref() == Some(wanted),
        }
    }
}
