//! Framework configuration loading
//!
//! Configuration files use the properties format the launcher has always
//! shipped with: one `key=value` pair per line, `#` or `!` comments, and an
//! optional `${includes}` pseudo-property listing further files to merge
//! (space separated, resolved relative to the including file). Values from
//! included files do not override keys already set by the including file.
//! CLI `-D key=value` definitions are overlaid last and win over any file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};

const INCLUDES_KEY: &str = "${includes}";

/// Merged framework configuration properties.
///
/// Keys are kept sorted so debug output and iteration are deterministic.
#[derive(Debug, Clone, Default)]
pub struct Config {
    properties: BTreeMap<String, String>,
}

impl Config {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a properties file, expanding `${includes}` recursively.
    ///
    /// A missing file yields an empty configuration, matching the launcher's
    /// behavior when `framework.properties` is absent.
    pub fn load(file: &Path) -> Result<Self> {
        let mut config = Self::new();
        if !file.exists() {
            debug!("Configuration file not found, skipping: {}", file.display());
            return Ok(config);
        }
        let mut visited = Vec::new();
        config.merge_file(file, &mut visited)?;
        Ok(config)
    }

    fn merge_file(&mut self, file: &Path, visited: &mut Vec<PathBuf>) -> Result<()> {
        // Unlike the tolerated top-level file, a named include must exist.
        if !file.exists() {
            return Err(Error::ConfigNotFound {
                path: file.display().to_string(),
            });
        }
        let canonical = file.canonicalize()?;
        if visited.contains(&canonical) {
            return Err(Error::invalid_config(format!(
                "include cycle detected at {}",
                file.display()
            )));
        }
        visited.push(canonical);

        debug!("Loading configuration file: {}", file.display());
        let content = std::fs::read_to_string(file)?;
        let props = parse_properties(&content)?;

        let includes = props.get(INCLUDES_KEY).cloned();
        for (key, value) in props {
            if key != INCLUDES_KEY {
                self.properties.entry(key).or_insert(value);
            }
        }

        if let Some(includes) = includes {
            let base = file.parent().unwrap_or_else(|| Path::new("."));
            for name in includes.split_whitespace() {
                self.merge_file(&base.join(name), visited)?;
            }
        }
        Ok(())
    }

    /// Overlay `key=value` definitions, overriding file-based properties.
    pub fn overlay_definitions<'a>(
        &mut self,
        definitions: impl IntoIterator<Item = &'a str>,
    ) -> Result<()> {
        for def in definitions {
            let (key, value) = def
                .split_once('=')
                .ok_or_else(|| Error::invalid_config(format!("expected key=value, got '{def}'")))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(Error::invalid_config(format!(
                    "empty property key in '{def}'"
                )));
            }
            self.properties.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    /// Set a property programmatically.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// Look up a property.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Look up a property, failing when absent.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key).ok_or_else(|| Error::missing_property(key))
    }

    /// Look up a boolean property; absent or unparsable means `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(|v| v.trim() == "true").unwrap_or(false)
    }

    /// Look up a path-valued property.
    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    /// Iterate over all properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether the configuration is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Parse properties file content into ordered key/value pairs.
pub fn parse_properties(content: &str) -> Result<BTreeMap<String, String>> {
    let mut props = BTreeMap::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let (key, value) = line.split_once('=').ok_or_else(|| {
            Error::invalid_config(format!("line {}: expected key=value", lineno + 1))
        })?;
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::invalid_config(format!(
                "line {}: empty property key",
                lineno + 1
            )));
        }
        props.insert(key.to_string(), value.trim().to_string());
    }
    Ok(props)
}
