use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};
use crate::vocab;

/// Globally addressable identifier for a stored object.
///
/// An `ObjectUri` is the namespace prefix concatenated with the local id.
/// By convention a namespace *includes* its trailing separator (`#` or `/`),
/// so joining is plain concatenation and splitting happens at the last `#`.
/// Anonymous identifiers are whole opaque URIs with no namespace part.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectUri(String);

impl ObjectUri {
    /// Wrap a complete object URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Join a namespace and a local id. Fails if the namespace does not end
    /// with a separator.
    pub fn namespaced(namespace: &str, local_id: &str) -> TypeResult<Self> {
        if !namespace.ends_with('#') && !namespace.ends_with('/') {
            return Err(TypeError::BadNamespace(namespace.to_string()));
        }
        Ok(Self(format!("{namespace}{local_id}")))
    }

    /// The URI as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether the URI lies inside the given namespace prefix.
    pub fn in_namespace(&self, namespace: &str) -> bool {
        !namespace.is_empty() && self.0.starts_with(namespace)
    }

    /// Split into `(namespace including '#', local id)` at the last `#`.
    ///
    /// Returns `None` for URIs without a fragment separator (anonymous ids,
    /// listed-license URIs, plain strings).
    pub fn split_fragment(&self) -> Option<(&str, &str)> {
        let idx = self.0.rfind('#')?;
        if idx == 0 {
            return None;
        }
        Some((&self.0[..=idx], &self.0[idx + 1..]))
    }

    /// The local id: the text after the last `#`, or the whole URI when no
    /// separator is present.
    pub fn local_id(&self) -> &str {
        match self.split_fragment() {
            Some((_, local)) => local,
            None => &self.0,
        }
    }

    /// The identifier kind derived from the URI's shape.
    pub fn id_kind(&self) -> IdKind {
        IdKind::of(&self.0)
    }
}

impl fmt::Display for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ObjectUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectUri({})", self.0)
    }
}

impl From<&str> for ObjectUri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ObjectUri {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Kind of an object identifier, used for copy-time translation decisions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdKind {
    /// Store-generated, opaque, unique only within one store.
    Anonymous,
    /// Human-assigned license reference (`LicenseRef-*`).
    LicenseRef,
    /// Human-assigned external document reference (`DocumentRef-*`).
    DocumentRef,
    /// Human-assigned element identifier (`SPDXRef-*`).
    ElementId,
    /// Canonical listed license; identical across all stores.
    ListedLicense,
    /// The literal `none` / `noassertion` sentinels.
    Literal,
    /// Anything the shape rules cannot classify.
    Unknown,
}

impl IdKind {
    /// Derive the identifier kind from a URI or bare local id.
    pub fn of(uri: &str) -> IdKind {
        if uri.starts_with(vocab::ANONYMOUS_ID_PREFIX) {
            return IdKind::Anonymous;
        }
        if uri.starts_with(vocab::LISTED_LICENSE_NAMESPACE) {
            return IdKind::ListedLicense;
        }
        let local = match uri.rfind('#') {
            Some(idx) => &uri[idx + 1..],
            None => uri,
        };
        if local.starts_with(vocab::LICENSE_REF_PREFIX) {
            IdKind::LicenseRef
        } else if local.starts_with(vocab::DOCUMENT_REF_PREFIX) {
            IdKind::DocumentRef
        } else if local.starts_with(vocab::ELEMENT_REF_PREFIX) {
            IdKind::ElementId
        } else if local.eq_ignore_ascii_case("none") || local.eq_ignore_ascii_case("noassertion") {
            IdKind::Literal
        } else {
            IdKind::Unknown
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdKind::Anonymous => "anonymous",
            IdKind::LicenseRef => "license-ref",
            IdKind::DocumentRef => "document-ref",
            IdKind::ElementId => "element-id",
            IdKind::ListedLicense => "listed-license",
            IdKind::Literal => "literal",
            IdKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Addressing/spec generation an object or reference complies with.
///
/// `Legacy` selects the older identifier-translation ruleset during copy,
/// which requires explicit destination namespaces for most non-anonymous
/// references.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecVersion {
    Legacy,
    Current,
}

impl SpecVersion {
    /// Whether copies targeting this version use the legacy-compatible
    /// addressing scheme.
    pub fn uses_legacy_addressing(&self) -> bool {
        matches!(self, SpecVersion::Legacy)
    }
}

impl fmt::Display for SpecVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecVersion::Legacy => f.write_str("legacy"),
            SpecVersion::Current => f.write_str("current"),
        }
    }
}
