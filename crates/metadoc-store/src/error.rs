use metadoc_types::{IdKind, ObjectUri, PropertyDescriptor};

/// Errors from model store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed object does not exist and creation was not requested.
    #[error("object not found: {0}")]
    NotFound(ObjectUri),

    /// Creation was attempted for an object URI already in use.
    #[error("object already exists: {0}")]
    AlreadyExists(ObjectUri),

    /// The existing object's type tag is incompatible with the requested one.
    #[error("type conflict for {uri}: stored as {existing}, requested {requested}")]
    TypeConflict {
        uri: ObjectUri,
        existing: String,
        requested: String,
    },

    /// A scalar operation was applied to a collection-valued property slot.
    #[error("property {property} of {uri} is collection-valued")]
    NotScalar {
        uri: ObjectUri,
        property: PropertyDescriptor,
    },

    /// A collection operation was applied to a scalar-valued property slot.
    #[error("property {property} of {uri} is scalar-valued")]
    NotCollection {
        uri: ObjectUri,
        property: PropertyDescriptor,
    },

    /// The store cannot generate identifiers of the requested kind.
    #[error("cannot generate identifiers of kind {0}")]
    UnsupportedIdKind(IdKind),

    /// Failure inside a concrete storage backend.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
