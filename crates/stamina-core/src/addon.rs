//! Addon references
//!
//! An addon is identified by a symbolic name and an optional version,
//! written as `addon:<name>` or `addon:<name>/<version>`. The `addon:`
//! scheme prefix is optional where a bare spec is expected (CLI arguments,
//! provision files use the full form).

use std::fmt;
use std::str::FromStr;

use semver::Version;

use crate::error::{Error, Result};

const SCHEME: &str = "addon:";

/// A reference to an addon: symbolic name plus optional exact version.
///
/// When no version is given, resolution picks the highest version available
/// across all configured repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonRef {
    name: String,
    version: Option<Version>,
}

impl AddonRef {
    /// Create a reference from parts.
    pub fn new(name: impl Into<String>, version: Option<Version>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::malformed_addon_ref(SCHEME));
        }
        Ok(Self { name, version })
    }

    /// Symbolic name of the addon.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exact version constraint, if any.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }
}

impl FromStr for AddonRef {
    type Err = Error;

    fn from_str(spec: &str) -> Result<Self> {
        let body = spec.strip_prefix(SCHEME).unwrap_or(spec).trim();

        let (name, version) = match body.split_once('/') {
            None => (body, None),
            Some((name, "")) => (name, None),
            Some((name, version)) => (name, Some(parse_lenient_version(version)?)),
        };

        if name.is_empty() {
            return Err(Error::malformed_addon_ref(spec));
        }
        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

impl fmt::Display for AddonRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}{}/{}", SCHEME, self.name, v),
            None => write!(f, "{}{}", SCHEME, self.name),
        }
    }
}

/// Parse a version string, padding missing parts.
///
/// Repository metadata frequently carries two-part versions (`1.1`), which
/// `semver` rejects; they are padded to `1.1.0` before parsing.
pub fn parse_lenient_version(version: &str) -> Result<Version> {
    let version = version.trim();
    let padded = match version.chars().filter(|c| *c == '.').count() {
        0 => format!("{version}.0.0"),
        1 => format!("{version}.0"),
        _ => version.to_string(),
    };
    Version::parse(&padded).map_err(|_| Error::invalid_version(version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_only() {
        let r: AddonRef = "addon:stamina-realm".parse().unwrap();
        assert_eq!(r.name(), "stamina-realm");
        assert!(r.version().is_none());
    }

    #[test]
    fn parses_name_and_version() {
        let r: AddonRef = "addon:stamina-realm/1.1.0".parse().unwrap();
        assert_eq!(r.name(), "stamina-realm");
        assert_eq!(r.version(), Some(&Version::new(1, 1, 0)));
    }

    #[test]
    fn accepts_bare_spec_without_scheme() {
        let r: AddonRef = "shell/2.0.1".parse().unwrap();
        assert_eq!(r.name(), "shell");
        assert_eq!(r.version(), Some(&Version::new(2, 0, 1)));
    }

    #[test]
    fn trailing_slash_means_no_version() {
        let r: AddonRef = "addon:shell/".parse().unwrap();
        assert_eq!(r.name(), "shell");
        assert!(r.version().is_none());
    }

    #[test]
    fn rejects_empty_name() {
        assert!("addon:".parse::<AddonRef>().is_err());
        assert!("addon:/1.0.0".parse::<AddonRef>().is_err());
        assert!("".parse::<AddonRef>().is_err());
    }

    #[test]
    fn rejects_garbage_version() {
        assert!("addon:shell/not-a-version".parse::<AddonRef>().is_err());
    }

    #[test]
    fn pads_short_versions() {
        assert_eq!(parse_lenient_version("1").unwrap(), Version::new(1, 0, 0));
        assert_eq!(parse_lenient_version("1.2").unwrap(), Version::new(1, 2, 0));
        assert_eq!(
            parse_lenient_version("1.2.3").unwrap(),
            Version::new(1, 2, 3)
        );
    }

    #[test]
    fn display_round_trips() {
        let r: AddonRef = "addon:shell/1.0.0".parse().unwrap();
        assert_eq!(r.to_string(), "addon:shell/1.0.0");
        let r: AddonRef = "addon:shell".parse().unwrap();
        assert_eq!(r.to_string(), "addon:shell");
    }
}
