/// Errors from identity and namespace construction.
#[derive(Debug, thiserror::Error)]
pub enum TypeError {
    /// A namespace must end with a separator so object URIs can be formed
    /// by plain concatenation.
    #[error("namespace must end with '#' or '/': {0}")]
    BadNamespace(String),
}

/// Result alias for identity operations.
pub type TypeResult<T> = Result<T, TypeError>;
