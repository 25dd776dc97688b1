//! Addon resolution
//!
//! Given an addon reference, collect matching capabilities from every
//! repository and pick the winner. The rule:
//!
//! - a candidate carrying the strictly greatest version wins;
//! - candidates without a version are only eligible when no candidate has
//!   one, and then the lexically first identity wins (they rank as 0.0.0).
//!
//! The original runtime fell back to "first capability found" for
//! version-less candidates, which depended on repository iteration order.
//! That ambiguity is replaced here by the deterministic identity ordering.

use semver::Version;
use stamina_core::{AddonRef, Error, Result};

use crate::repository::RepositorySet;
use crate::types::Resource;

/// Resolve an addon reference against a repository set.
///
/// Returns the selected resource, or [`Error::AddonNotFound`] when no
/// repository provides a match.
pub fn resolve<'a>(set: &'a RepositorySet, addon: &AddonRef) -> Result<&'a Resource> {
    let candidates = set.find_addons(addon);
    match select_best(&candidates) {
        Some(i) => Ok(candidates[i]),
        None => Err(Error::addon_not_found(addon.to_string())),
    }
}

/// Select the best candidate among matching resources.
///
/// Pure selection rule over `(identity, version)` pairs, isolated so it can
/// be unit-tested without repositories or filesystem state. Returns the
/// index of the winner, or `None` for an empty candidate list.
pub fn select_best(candidates: &[&Resource]) -> Option<usize> {
    let mut best: Option<usize> = None;

    for (i, candidate) in candidates.iter().enumerate() {
        let Some(version) = candidate.version.as_ref() else {
            continue;
        };
        match best {
            None => best = Some(i),
            Some(b) => {
                if version > candidates[b].version.as_ref().unwrap_or(&Version::new(0, 0, 0)) {
                    best = Some(i);
                }
            }
        }
    }
    if best.is_some() {
        return best;
    }

    // No candidate carries a version: deterministic fallback on identity.
    candidates
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.identity.cmp(&b.identity))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use crate::types::ResourceKind;
    use std::path::PathBuf;

    fn feature(identity: &str, version: Option<&str>) -> Resource {
        Resource {
            identity: identity.to_string(),
            version: version.map(|v| Version::parse(v).unwrap()),
            kind: ResourceKind::Feature,
            url: PathBuf::from(format!(
                "/repo/{identity}-{}.esa",
                version.unwrap_or("any")
            )),
            size: 64,
            sha256: "ab".repeat(32),
        }
    }

    fn set_of(resources: Vec<Resource>) -> RepositorySet {
        let mut set = RepositorySet::new();
        set.add(
            PathBuf::from("/repo/obr.xml"),
            Repository::new("test", 0, resources),
        );
        set
    }

    #[test]
    fn unversioned_request_selects_highest_version() {
        let set = set_of(vec![
            feature("stamina-realm", Some("1.1.0")),
            feature("stamina-realm", Some("1.3.0")),
            feature("stamina-realm", Some("1.2.5")),
        ]);
        let addon = "addon:stamina-realm".parse().unwrap();
        let winner = resolve(&set, &addon).unwrap();
        assert_eq!(winner.version, Some(Version::new(1, 3, 0)));
    }

    #[test]
    fn versioned_request_selects_exact_match() {
        let set = set_of(vec![
            feature("stamina-realm", Some("1.1.0")),
            feature("stamina-realm", Some("1.3.0")),
        ]);
        let addon = "addon:stamina-realm/1.1.0".parse().unwrap();
        let winner = resolve(&set, &addon).unwrap();
        assert_eq!(winner.version, Some(Version::new(1, 1, 0)));
    }

    #[test]
    fn versioned_request_fails_without_exact_match() {
        let set = set_of(vec![feature("stamina-realm", Some("1.1.0"))]);
        let addon = "addon:stamina-realm/1.2.0".parse().unwrap();
        assert!(matches!(
            resolve(&set, &addon),
            Err(Error::AddonNotFound { .. })
        ));
    }

    #[test]
    fn unknown_addon_is_not_found() {
        let set = set_of(vec![feature("stamina-realm", Some("1.1.0"))]);
        let addon = "addon:nope".parse().unwrap();
        assert!(matches!(
            resolve(&set, &addon),
            Err(Error::AddonNotFound { .. })
        ));
    }

    #[test]
    fn versioned_candidates_beat_versionless_ones() {
        let set = set_of(vec![
            feature("stamina-shell", None),
            feature("stamina-shell", Some("0.1.0")),
        ]);
        let addon = "addon:stamina-shell".parse().unwrap();
        let winner = resolve(&set, &addon).unwrap();
        assert_eq!(winner.version, Some(Version::new(0, 1, 0)));
    }

    #[test]
    fn versionless_fallback_is_deterministic() {
        // Both candidates lack a version: the lexically first identity wins,
        // regardless of iteration order.
        let a = feature("aaa", None);
        let b = feature("bbb", None);
        assert_eq!(select_best(&[&b, &a]), Some(1));
        assert_eq!(select_best(&[&a, &b]), Some(0));
    }

    #[test]
    fn highest_version_wins_across_repositories() {
        let mut set = RepositorySet::new();
        set.add(
            PathBuf::from("/a/obr.xml"),
            Repository::new("a", 0, vec![feature("x", Some("1.1.0"))]),
        );
        set.add(
            PathBuf::from("/b/obr.xml"),
            Repository::new("b", 0, vec![feature("x", Some("1.3.0"))]),
        );
        let addon = "addon:x".parse().unwrap();
        let winner = resolve(&set, &addon).unwrap();
        assert_eq!(winner.version, Some(Version::new(1, 3, 0)));
    }

    #[test]
    fn empty_candidate_list_selects_nothing() {
        assert_eq!(select_best(&[]), None);
    }
}
