//! Launcher build identity
//!
//! The optional fields are filled in by the build script: the git revision
//! when the tree is a checkout, the build date always, and the target
//! triple forwarded from the build environment.

use std::fmt;

use serde::Serialize;

/// Build identity reported by the `version` command.
#[derive(Debug, Clone, Serialize)]
pub struct VersionInfo {
    /// Package version.
    pub version: &'static str,
    /// Short git revision the binary was built from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<&'static str>,
    /// Build date (UTC).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub built: Option<&'static str>,
    /// Target triple.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<&'static str>,
}

impl VersionInfo {
    /// Identity of the running binary.
    pub fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            revision: option_env!("STAMINA_GIT_REV"),
            built: option_env!("STAMINA_BUILD_DATE"),
            target: option_env!("STAMINA_TARGET"),
        }
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stamina {}", self.version)?;
        if let Some(revision) = self.revision {
            write!(f, " ({revision})")?;
        }
        if let Some(target) = self.target {
            write!(f, " {target}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_binary_and_version() {
        let info = VersionInfo::current();
        let text = info.to_string();
        assert!(text.starts_with(&format!("stamina {}", env!("CARGO_PKG_VERSION"))));
        // The build script forwards the target triple.
        assert!(info.target.is_some());
    }

    #[test]
    fn json_omits_absent_build_details() {
        let info = VersionInfo {
            version: "1.0.0",
            revision: None,
            built: None,
            target: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["version"], "1.0.0");
        assert!(json.get("revision").is_none());
        assert!(json.get("built").is_none());
    }
}
