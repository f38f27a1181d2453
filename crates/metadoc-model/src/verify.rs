//! Verification capability traits.
//!
//! Domain types implement [`Verifiable`] to plug their own consistency
//! checks into generic graph traversal. The provided [`Verifiable::verify`]
//! wrapper carries the visited-id set that keeps traversal of cyclic object
//! graphs finite; implementations put their actual checks in
//! [`Verifiable::check`] and recurse into referenced objects through
//! `verify`, never `check`.

use std::collections::HashSet;

use metadoc_types::{ObjectUri, SpecVersion};

/// Anything carrying a concrete model type tag.
pub trait TypeTagged {
    fn type_name(&self) -> &str;
}

/// A model object that can validate itself against a spec version.
pub trait Verifiable: TypeTagged {
    /// The object's address, used for cycle detection.
    fn object_uri(&self) -> ObjectUri;

    /// Type-specific consistency checks. Findings are human-readable
    /// warning/error strings; an empty list means the object is clean.
    fn check(&self, visited: &mut HashSet<ObjectUri>, spec_version: SpecVersion) -> Vec<String>;

    /// Run [`check`](Self::check) unless this object was already visited.
    ///
    /// Short-circuiting on a repeat visit is the cycle guard for graph
    /// traversal; each object contributes its findings exactly once.
    fn verify(&self, visited: &mut HashSet<ObjectUri>, spec_version: SpecVersion) -> Vec<String> {
        if !visited.insert(self.object_uri()) {
            return Vec::new();
        }
        self.check(visited, spec_version)
    }
}

/// Verify every item in a collection, prefixing each finding with `prefix`
/// so aggregated reports stay attributable.
pub fn verify_collection(
    items: &[&dyn Verifiable],
    prefix: &str,
    visited: &mut HashSet<ObjectUri>,
    spec_version: SpecVersion,
) -> Vec<String> {
    let mut findings = Vec::new();
    for item in items {
        for finding in item.verify(visited, spec_version) {
            findings.push(format!("{prefix}{finding}"));
        }
    }
    findings
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Checked {
        uri: ObjectUri,
        findings: Vec<String>,
    }

    impl Checked {
        fn new(uri: &str, findings: &[&str]) -> Self {
            Self {
                uri: ObjectUri::new(uri),
                findings: findings.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl TypeTagged for Checked {
        fn type_name(&self) -> &str {
            "Checked"
        }
    }

    impl Verifiable for Checked {
        fn object_uri(&self) -> ObjectUri {
            self.uri.clone()
        }

        fn check(&self, _visited: &mut HashSet<ObjectUri>, _spec: SpecVersion) -> Vec<String> {
            self.findings.clone()
        }
    }

    #[test]
    fn verify_reports_findings_once() {
        let object = Checked::new("https://ex.org/doc#SPDXRef-a", &["missing name"]);
        let mut visited = HashSet::new();
        assert_eq!(
            object.verify(&mut visited, SpecVersion::Current),
            vec!["missing name".to_string()]
        );
        // Second visit short-circuits.
        assert!(object.verify(&mut visited, SpecVersion::Current).is_empty());
    }

    #[test]
    fn verify_collection_prefixes_findings() {
        let a = Checked::new("https://ex.org/doc#SPDXRef-a", &["bad checksum"]);
        let b = Checked::new("https://ex.org/doc#SPDXRef-b", &[]);
        let mut visited = HashSet::new();
        let findings = verify_collection(
            &[&a, &b],
            "package files: ",
            &mut visited,
            SpecVersion::Current,
        );
        assert_eq!(findings, vec!["package files: bad checksum".to_string()]);
    }

    #[test]
    fn duplicate_items_contribute_once() {
        let a = Checked::new("https://ex.org/doc#SPDXRef-a", &["finding"]);
        let mut visited = HashSet::new();
        let findings =
            verify_collection(&[&a, &a], "", &mut visited, SpecVersion::Current);
        assert_eq!(findings.len(), 1);
    }
}
