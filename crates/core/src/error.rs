//! Operational error taxonomy shared by every storage backend.
//!
//! These are the errors an engine can raise while serving a request. The
//! public crate wraps them into its own `Error` type; nothing here is
//! retried internally and nothing is process-fatal.

use thiserror::Error;

/// Errors raised by storage engines and the facade's engine factory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Insert attempted with an identifier that already exists
    #[error("record already exists: {id}")]
    DuplicateId {
        /// The conflicting record identifier
        id: String,
    },

    /// Update or delete attempted on an absent identifier
    #[error("record not found: {id}")]
    NotFound {
        /// The missing record identifier
        id: String,
    },

    /// A transaction is already open on this engine instance
    #[error("transaction already in progress")]
    TransactionInProgress,

    /// Commit or rollback attempted with no open transaction
    #[error("no transaction in progress")]
    NoActiveTransaction,

    /// Index creation attempted for an already-indexed field
    #[error("index already exists for field: {field}")]
    IndexExists {
        /// The metadata field
        field: String,
    },

    /// Index drop attempted for a field with no index
    #[error("no index exists for field: {field}")]
    IndexMissing {
        /// The metadata field
        field: String,
    },

    /// Distance metric name not recognized
    #[error("unsupported distance metric: {metric}")]
    UnsupportedMetric {
        /// The unrecognized metric name
        metric: String,
    },

    /// Engine kind declared in configuration but not implemented
    #[error("engine not implemented: {kind}")]
    EngineNotImplemented {
        /// The engine kind name
        kind: String,
    },

    /// Vector length does not match the store's configured dimension
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The configured dimension
        expected: usize,
        /// The offending vector's length
        actual: usize,
    },

    /// Configuration rejected at construction time
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected
        reason: String,
    },
}

/// Result alias for engine operations.
pub type EngineResult<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::DimensionMismatch {
            expected: 384,
            actual: 128,
        };
        assert_eq!(err.to_string(), "dimension mismatch: expected 384, got 128");
    }

    #[test]
    fn test_not_found_display_includes_id() {
        let err = EngineError::NotFound {
            id: "doc-1".to_string(),
        };
        assert!(err.to_string().contains("doc-1"));
    }
}
