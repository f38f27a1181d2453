use metadoc_copy::CopyError;
use metadoc_store::StoreError;
use metadoc_types::{ObjectUri, PropertyDescriptor, TypeError};

/// Errors from the object accessor and collection views.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The addressed object does not exist and creation was not requested.
    #[error("object not found: {0}")]
    NotFound(ObjectUri),

    /// The object (or a collection's committed elements) carries a type
    /// incompatible with the one requested.
    #[error("type conflict for {uri}: stored as {existing}, requested {requested}")]
    TypeConflict {
        uri: ObjectUri,
        existing: String,
        requested: String,
    },

    /// A stored value does not match the type the accessor asked for.
    #[error("property {property} holds {actual}, expected {expected}")]
    WrongType {
        property: PropertyDescriptor,
        expected: String,
        actual: String,
    },

    /// An individual value URI that maps to no known enumerant.
    #[error("unknown sentinel or enumerant URI: {0}")]
    UnknownSentinel(String),

    /// A value bound to a different store was written without a copy
    /// manager attached.
    #[error("cannot store reference to {0}: copying between stores is not enabled")]
    CopyingDisabled(ObjectUri),

    /// Identifier construction failed.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// A store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A cross-store copy failed.
    #[error(transparent)]
    Copy(#[from] CopyError),
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
