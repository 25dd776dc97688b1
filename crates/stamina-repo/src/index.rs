//! Repository index file handling
//!
//! The index is an XML document in the OSGi repository namespace: one
//! `resource` element per artifact, each carrying an `osgi.identity`
//! capability (identity, type, version) and an `osgi.content` capability
//! (sha-256 checksum, url, size).

use std::path::{Path, PathBuf};

use stamina_core::{parse_lenient_version, Error, Result};
use tracing::debug;

use crate::repository::Repository;
use crate::types::{Resource, ResourceKind};

const REPOSITORY_NS: &str = "http://www.osgi.org/xmlns/repository/v1.0.0";

/// Read a repository from an index file.
pub fn read_index(file: &Path) -> Result<Repository> {
    debug!("Reading repository index: {}", file.display());
    let content = std::fs::read_to_string(file)?;
    parse_index(&content)
}

/// Parse repository index XML.
///
/// Unknown elements and attributes are ignored; a resource missing its
/// identity or content url is rejected.
pub fn parse_index(xml: &str) -> Result<Repository> {
    let doc = roxmltree::Document::parse(xml)
        .map_err(|e| Error::invalid_index(format!("XML parse error: {e}")))?;
    let root = doc.root_element();
    if root.tag_name().name() != "repository" {
        return Err(Error::invalid_index(format!(
            "unexpected root element '{}'",
            root.tag_name().name()
        )));
    }

    let name = root.attribute("name").unwrap_or("repository").to_string();
    let increment = root
        .attribute("increment")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut resources = Vec::new();
    for node in root
        .children()
        .filter(|n| n.tag_name().name() == "resource")
    {
        resources.push(parse_resource(node)?);
    }

    Ok(Repository::new(name, increment, resources))
}

fn parse_resource(node: roxmltree::Node<'_, '_>) -> Result<Resource> {
    let mut identity = None;
    let mut version = None;
    let mut kind = None;
    let mut url = None;
    let mut size = 0u64;
    let mut sha256 = String::new();

    for cap in node
        .children()
        .filter(|n| n.tag_name().name() == "capability")
    {
        let namespace = cap.attribute("namespace").unwrap_or_default();
        for attr in cap
            .children()
            .filter(|n| n.tag_name().name() == "attribute")
        {
            let attr_name = attr.attribute("name").unwrap_or_default();
            let Some(value) = attr.attribute("value") else {
                continue;
            };
            match (namespace, attr_name) {
                ("osgi.identity", "osgi.identity") => identity = Some(value.to_string()),
                ("osgi.identity", "type") => kind = ResourceKind::from_wire_type(value),
                ("osgi.identity", "version") => {
                    version = Some(parse_lenient_version(value)?);
                }
                ("osgi.content", "osgi.content") => sha256 = value.to_string(),
                ("osgi.content", "url") => url = Some(PathBuf::from(value)),
                ("osgi.content", "size") => {
                    size = value.parse().unwrap_or(0);
                }
                _ => {}
            }
        }
    }

    let identity =
        identity.ok_or_else(|| Error::invalid_index("resource without identity attribute"))?;
    let url = url.ok_or_else(|| {
        Error::invalid_index(format!("resource '{identity}' without content url"))
    })?;

    Ok(Resource {
        identity,
        version,
        kind: kind.unwrap_or(ResourceKind::Bundle),
        url,
        size,
        sha256,
    })
}

/// Serialize a repository to index XML.
pub fn write_index(repository: &Repository) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!(
        "<repository xmlns=\"{}\" increment=\"{}\" name=\"{}\">\n",
        REPOSITORY_NS,
        repository.increment(),
        escape(repository.name())
    ));

    for rsc in repository.resources() {
        out.push_str("  <resource>\n");
        out.push_str("    <capability namespace=\"osgi.identity\">\n");
        push_attribute(&mut out, "osgi.identity", None, &rsc.identity);
        push_attribute(&mut out, "type", None, rsc.kind.wire_type());
        if let Some(version) = &rsc.version {
            push_attribute(&mut out, "version", Some("Version"), &version.to_string());
        }
        out.push_str("    </capability>\n");
        out.push_str("    <capability namespace=\"osgi.content\">\n");
        push_attribute(&mut out, "osgi.content", None, &rsc.sha256);
        push_attribute(&mut out, "url", None, &rsc.url.display().to_string());
        push_attribute(&mut out, "size", Some("Long"), &rsc.size.to_string());
        out.push_str("    </capability>\n");
        out.push_str("  </resource>\n");
    }

    out.push_str("</repository>\n");
    out
}

fn push_attribute(out: &mut String, name: &str, attr_type: Option<&str>, value: &str) {
    match attr_type {
        Some(t) => out.push_str(&format!(
            "      <attribute name=\"{}\" type=\"{}\" value=\"{}\"/>\n",
            name,
            t,
            escape(value)
        )),
        None => out.push_str(&format!(
            "      <attribute name=\"{}\" value=\"{}\"/>\n",
            name,
            escape(value)
        )),
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use semver::Version;

    fn sample_repository() -> Repository {
        Repository::new(
            "Stamina Runtime System Repository",
            1234,
            vec![
                Resource {
                    identity: "stamina-realm".to_string(),
                    version: Some(Version::new(1, 3, 0)),
                    kind: ResourceKind::Feature,
                    url: PathBuf::from("/sys/stamina-realm-1.3.0.esa"),
                    size: 2048,
                    sha256: "cd".repeat(32),
                },
                Resource {
                    identity: "stamina-logging".to_string(),
                    version: None,
                    kind: ResourceKind::Bundle,
                    url: PathBuf::from("/sys/stamina-logging.jar"),
                    size: 512,
                    sha256: "ef".repeat(32),
                },
            ],
        )
    }

    #[test]
    fn index_round_trips() {
        let repo = sample_repository();
        let xml = write_index(&repo);
        let parsed = parse_index(&xml).unwrap();

        assert_eq!(parsed.name(), repo.name());
        assert_eq!(parsed.increment(), 1234);
        assert_eq!(parsed.resources().len(), 2);

        let realm = &parsed.resources()[0];
        assert_eq!(realm.identity, "stamina-realm");
        assert_eq!(realm.version, Some(Version::new(1, 3, 0)));
        assert_eq!(realm.kind, ResourceKind::Feature);
        assert_eq!(realm.size, 2048);

        let logging = &parsed.resources()[1];
        assert!(logging.version.is_none());
        assert_eq!(logging.kind, ResourceKind::Bundle);
    }

    #[test]
    fn resource_without_identity_is_rejected() {
        let xml = r#"<?xml version="1.0"?>
<repository name="broken">
  <resource>
    <capability namespace="osgi.content">
      <attribute name="url" value="/sys/x.jar"/>
    </capability>
  </resource>
</repository>"#;
        assert!(matches!(
            parse_index(xml),
            Err(stamina_core::Error::InvalidIndex { .. })
        ));
    }

    #[test]
    fn resource_without_url_is_rejected() {
        let xml = r#"<?xml version="1.0"?>
<repository name="broken">
  <resource>
    <capability namespace="osgi.identity">
      <attribute name="osgi.identity" value="x"/>
    </capability>
  </resource>
</repository>"#;
        assert!(parse_index(xml).is_err());
    }

    #[test]
    fn unknown_elements_are_ignored() {
        let xml = r#"<?xml version="1.0"?>
<repository name="lenient" increment="7">
  <referral url="elsewhere.xml"/>
  <resource>
    <capability namespace="osgi.identity">
      <attribute name="osgi.identity" value="x"/>
      <attribute name="type" value="osgi.subsystem.feature"/>
      <attribute name="novel" value="ignored"/>
    </capability>
    <capability namespace="osgi.content">
      <attribute name="url" value="/sys/x.esa"/>
    </capability>
  </resource>
</repository>"#;
        let repo = parse_index(xml).unwrap();
        assert_eq!(repo.increment(), 7);
        assert_eq!(repo.resources().len(), 1);
        assert_eq!(repo.resources()[0].kind, ResourceKind::Feature);
    }

    #[test]
    fn names_are_escaped() {
        let repo = Repository::new("a <b> & \"c\"", 0, Vec::new());
        let xml = write_index(&repo);
        assert!(xml.contains("a &lt;b&gt; &amp; &quot;c&quot;"));
        assert_eq!(parse_index(&xml).unwrap().name(), "a <b> & \"c\"");
    }
}
