//! Well-known URIs, identifier prefixes, and designated property names.
//!
//! These constants are the small, stable vocabulary the core itself needs to
//! make addressing and equivalence decisions. Spec-version-specific class and
//! property vocabularies live in the surrounding model layers, not here.

/// URI form of the "none" sentinel value.
pub const URI_VALUE_NONE: &str = "http://spdx.org/rdf/terms#none";

/// URI form of the "no assertion" sentinel value.
pub const URI_VALUE_NOASSERTION: &str = "http://spdx.org/rdf/terms#noassertion";

/// Literal string form of the "none" sentinel.
pub const NONE_VALUE: &str = "NONE";

/// Literal string form of the "no assertion" sentinel.
pub const NOASSERTION_VALUE: &str = "NOASSERTION";

/// Namespace under which all listed (canonical, store-independent) licenses
/// live. URIs with this prefix are never translated when copied.
pub const LISTED_LICENSE_NAMESPACE: &str = "https://spdx.org/licenses/";

/// Prefix for store-generated anonymous identifiers.
pub const ANONYMOUS_ID_PREFIX: &str = "__anon-";

/// Local-id prefix for license references.
pub const LICENSE_REF_PREFIX: &str = "LicenseRef-";

/// Local-id prefix for external document references.
pub const DOCUMENT_REF_PREFIX: &str = "DocumentRef-";

/// Local-id prefix for element identifiers.
pub const ELEMENT_REF_PREFIX: &str = "SPDXRef-";

/// Type tag for external document reference objects. The legacy addressing
/// scheme special-cases references of this type during copy.
pub const EXTERNAL_DOCUMENT_REF_TYPE: &str = "ExternalDocumentRef";

/// Name of the relationship property pointing back at a related element.
/// Equivalence comparison breaks recursion cycles through this property.
pub const RELATED_ELEMENT_PROPERTY: &str = "relatedSpdxElement";

/// Name of the package flag property whose `true` value is treated as
/// equivalent to the property being absent.
pub const FILES_ANALYZED_PROPERTY: &str = "filesAnalyzed";
