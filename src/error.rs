//! Public error type for Recall.
//!
//! Engine errors are translated 1:1 into this flat enum so callers match on
//! a single stable taxonomy without depending on internal crates.

use recall_core::EngineError;
use thiserror::Error;

/// All Recall errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Insert attempted with an identifier that already exists
    #[error("record already exists: {0}")]
    DuplicateId(String),

    /// Update or delete attempted on an absent identifier
    #[error("record not found: {0}")]
    NotFound(String),

    /// A transaction is already open
    #[error("transaction already in progress")]
    TransactionInProgress,

    /// Commit or rollback attempted with no open transaction
    #[error("no transaction in progress")]
    NoActiveTransaction,

    /// Index creation attempted for an already-indexed field
    #[error("index already exists for field: {0}")]
    IndexExists(String),

    /// Index drop attempted for a field with no index
    #[error("no index exists for field: {0}")]
    IndexMissing(String),

    /// Distance metric name not recognized
    #[error("unsupported distance metric: {0}")]
    UnsupportedMetric(String),

    /// Engine kind declared in configuration but not implemented
    #[error("engine not implemented: {0}")]
    EngineNotImplemented(String),

    /// Vector length does not match the configured dimension
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// The configured dimension
        expected: usize,
        /// The offending vector's length
        actual: usize,
    },

    /// Configuration rejected at construction time
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type for Recall operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this error reports a transaction-state problem.
    pub fn is_transaction_error(&self) -> bool {
        matches!(
            self,
            Error::TransactionInProgress | Error::NoActiveTransaction
        )
    }
}

impl From<EngineError> for Error {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::DuplicateId { id } => Error::DuplicateId(id),
            EngineError::NotFound { id } => Error::NotFound(id),
            EngineError::TransactionInProgress => Error::TransactionInProgress,
            EngineError::NoActiveTransaction => Error::NoActiveTransaction,
            EngineError::IndexExists { field } => Error::IndexExists(field),
            EngineError::IndexMissing { field } => Error::IndexMissing(field),
            EngineError::UnsupportedMetric { metric } => Error::UnsupportedMetric(metric),
            EngineError::EngineNotImplemented { kind } => Error::EngineNotImplemented(kind),
            EngineError::DimensionMismatch { expected, actual } => {
                Error::DimensionMismatch { expected, actual }
            }
            EngineError::InvalidConfig { reason } => Error::Config(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_translation() {
        let err: Error = EngineError::DuplicateId {
            id: "a".to_string(),
        }
        .into();
        assert_eq!(err, Error::DuplicateId("a".to_string()));
    }

    #[test]
    fn test_predicates() {
        assert!(Error::NotFound("x".to_string()).is_not_found());
        assert!(Error::NoActiveTransaction.is_transaction_error());
        assert!(!Error::Config("bad".to_string()).is_not_found());
    }
}
