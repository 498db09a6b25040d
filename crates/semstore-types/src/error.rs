use thiserror::Error;

/// Errors from semantic store operations.
///
/// The variants distinguish caller mistakes (invalid vector, invalid
/// argument, unknown store) from backing-service failures (embedding
/// provider, database), so callers can pick a recovery strategy.
#[derive(Debug, Error)]
pub enum SemanticStoreError {
    #[error("invalid vector: {0}")]
    InvalidVector(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("store '{0}' not found")]
    StoreNotFound(String),

    #[error("embedding provider error: {0}")]
    Provider(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl SemanticStoreError {
    /// Shorthand for an `InvalidArgument` with a formatted message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Shorthand for an `InvalidVector` with a formatted message.
    pub fn invalid_vector(msg: impl Into<String>) -> Self {
        Self::InvalidVector(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_not_found_display() {
        let err = SemanticStoreError::StoreNotFound("docs".to_string());
        assert_eq!(err.to_string(), "store 'docs' not found");
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = SemanticStoreError::invalid_argument("top_k must be positive");
        assert_eq!(err.to_string(), "invalid argument: top_k must be positive");
    }

    #[test]
    fn test_storage_display() {
        let err = SemanticStoreError::Storage("connection refused".to_string());
        assert_eq!(err.to_string(), "storage error: connection refused");
    }
}
