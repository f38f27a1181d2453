use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identity::{ObjectUri, SpecVersion};
use crate::vocab;

/// A typed pointer to another stored object.
///
/// References are never embedded inline: the target object lives in the
/// store under `uri`, and this value records only the address, the type tag
/// it was created with, and the spec version it complies with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypedRef {
    pub uri: ObjectUri,
    pub type_name: String,
    pub spec_version: SpecVersion,
}

impl TypedRef {
    pub fn new(
        uri: impl Into<ObjectUri>,
        type_name: impl Into<String>,
        spec_version: SpecVersion,
    ) -> Self {
        Self {
            uri: uri.into(),
            type_name: type_name.into(),
            spec_version,
        }
    }
}

impl fmt::Display for TypedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.type_name, self.uri)
    }
}

/// The closed set of scalar values a store property slot may hold.
///
/// Collection-valued slots hold a sequence of these. A slot is either
/// scalar-valued or collection-valued for its whole lifetime; backends
/// reject operations of the wrong shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StoredValue {
    /// Primitive string.
    Str(String),
    /// Primitive boolean.
    Bool(bool),
    /// Primitive integer.
    Int(i64),
    /// A sentinel or enumerant referenced by URI rather than stored as an
    /// object (e.g. "none", "no-assertion", or an enum member).
    Individual(String),
    /// A typed reference to another stored object.
    Ref(TypedRef),
}

impl StoredValue {
    /// The sentinel/enumerant URI, if this is an `Individual` value.
    pub fn individual_uri(&self) -> Option<&str> {
        match self {
            StoredValue::Individual(uri) => Some(uri),
            _ => None,
        }
    }

    /// Whether this is the "none" sentinel.
    pub fn is_none_sentinel(&self) -> bool {
        self.individual_uri() == Some(vocab::URI_VALUE_NONE)
    }

    /// Whether this is the "no assertion" sentinel.
    pub fn is_noassertion_sentinel(&self) -> bool {
        self.individual_uri() == Some(vocab::URI_VALUE_NOASSERTION)
    }
}

impl From<&str> for StoredValue {
    fn from(s: &str) -> Self {
        StoredValue::Str(s.to_string())
    }
}

impl From<String> for StoredValue {
    fn from(s: String) -> Self {
        StoredValue::Str(s)
    }
}

impl From<bool> for StoredValue {
    fn from(b: bool) -> Self {
        StoredValue::Bool(b)
    }
}

impl From<i64> for StoredValue {
    fn from(i: i64) -> Self {
        StoredValue::Int(i)
    }
}

impl From<TypedRef> for StoredValue {
    fn from(r: TypedRef) -> Self {
        StoredValue::Ref(r)
    }
}
