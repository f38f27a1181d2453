use metadoc_types::vocab;

use crate::collection::ModelCollection;
use crate::object::ModelObject;

/// The domain-side value union handled by the accessor.
///
/// This mirrors [`StoredValue`](metadoc_types::StoredValue) with two
/// additions: `Object` is a live handle rather than a bare reference, and
/// sequences come in two flavors. Getters produce `Collection` (a live view
/// over the store); setters additionally accept `List` (a literal sequence
/// that replaces the stored collection wholesale).
#[derive(Clone, Debug)]
pub enum ModelValue {
    Str(String),
    Bool(bool),
    Int(i64),
    /// A sentinel or enumerant referenced by URI.
    Individual(String),
    /// A live handle to another stored object.
    Object(ModelObject),
    /// A live view over a collection-valued property.
    Collection(ModelCollection),
    /// A literal sequence of values, accepted by setters.
    List(Vec<ModelValue>),
}

impl ModelValue {
    /// The canonical "none" sentinel.
    pub fn none() -> Self {
        ModelValue::Individual(vocab::URI_VALUE_NONE.to_string())
    }

    /// The canonical "no assertion" sentinel.
    pub fn no_assertion() -> Self {
        ModelValue::Individual(vocab::URI_VALUE_NOASSERTION.to_string())
    }

    /// A short name for the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ModelValue::Str(_) => "string",
            ModelValue::Bool(_) => "boolean",
            ModelValue::Int(_) => "integer",
            ModelValue::Individual(_) => "individual",
            ModelValue::Object(_) => "object",
            ModelValue::Collection(_) => "collection",
            ModelValue::List(_) => "list",
        }
    }
}

/// Equality is by value for primitives and sentinels, by identity for
/// objects (same address, plus same store for anonymous ids), and by
/// binding for collection views.
impl PartialEq for ModelValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ModelValue::Str(a), ModelValue::Str(b)) => a == b,
            (ModelValue::Bool(a), ModelValue::Bool(b)) => a == b,
            (ModelValue::Int(a), ModelValue::Int(b)) => a == b,
            (ModelValue::Individual(a), ModelValue::Individual(b)) => a == b,
            (ModelValue::Object(a), ModelValue::Object(b)) => a == b,
            (ModelValue::Collection(a), ModelValue::Collection(b)) => a.same_binding(b),
            (ModelValue::List(a), ModelValue::List(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for ModelValue {
    fn from(s: &str) -> Self {
        ModelValue::Str(s.to_string())
    }
}

impl From<String> for ModelValue {
    fn from(s: String) -> Self {
        ModelValue::Str(s)
    }
}

impl From<bool> for ModelValue {
    fn from(b: bool) -> Self {
        ModelValue::Bool(b)
    }
}

impl From<i64> for ModelValue {
    fn from(i: i64) -> Self {
        ModelValue::Int(i)
    }
}

impl From<ModelObject> for ModelValue {
    fn from(o: ModelObject) -> Self {
        ModelValue::Object(o)
    }
}

/// Capability trait for enumerant types addressed by URI.
///
/// Domain enums implement this so [`ModelObject::get_enum`] can map a stored
/// `Individual` value back to a typed member.
pub trait UriEnum: Sized {
    /// The member identified by the given URI, if any.
    fn from_uri(uri: &str) -> Option<Self>;

    /// The URI identifying this member.
    fn uri(&self) -> &str;
}
