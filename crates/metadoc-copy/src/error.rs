use metadoc_store::StoreError;
use metadoc_types::{ObjectUri, TypeError};

/// Errors from cross-store copy operations.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// The legacy addressing scheme needs a destination namespace to
    /// translate this identifier, and none was supplied.
    #[error("destination namespace required to copy {0} under legacy addressing")]
    NamespaceRequired(ObjectUri),

    /// Identifier construction failed.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// A store operation failed mid-copy. The destination may hold a
    /// partially populated object.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for copy operations.
pub type CopyResult<T> = Result<T, CopyError>;
